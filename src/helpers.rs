use strsim::levenshtein;

/// Find the candidate closest to `target`, ignoring ASCII case, if any is
/// within two edits.
pub fn find_similar<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let target = target.to_ascii_lowercase();
    candidates
        .iter()
        .map(|&candidate| {
            let distance = levenshtein(&target, &candidate.to_ascii_lowercase());
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}
