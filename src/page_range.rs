use std::collections::BTreeSet;

/// Parse a page range expression like "1-3,5" into the set of page ids it
/// names.
///
/// The expression is a comma-separated list of tokens, each either a bare
/// page number ("5") or an inclusive dash range ("1-3"). Range bounds may be
/// given in either order: "5-2" covers pages 2 through 5. Tokens that do not
/// parse are skipped without aborting the rest of the expression.
///
/// Ids are not checked against any page count; callers intersect the result
/// with the ids that actually exist.
pub fn parse_range_set(input: &str) -> BTreeSet<u32> {
    let mut ids = BTreeSet::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((lhs, rhs)) = token.split_once('-') {
            let (Ok(a), Ok(b)) = (lhs.trim().parse::<u32>(), rhs.trim().parse::<u32>()) else {
                continue;
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            ids.extend(lo..=hi);
        } else if let Ok(n) = token.parse::<u32>() {
            ids.insert(n);
        }
    }

    ids
}
