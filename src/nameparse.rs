//! Filename → location heuristic for release-feed assets.
//!
//! Calendar files are published as `<province-slug>-<town-or-block>.ics`.
//! The split is best-effort: the last `-` before the extension separates the
//! province slug from the trailing token, and a fully numeric trailing token
//! is read as a block number. There is no guarantee upstream filenames follow
//! the convention, so this never errors; it only classifies.

/// Location fields derived from an asset filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Province slug with hyphens replaced by spaces. Empty when the
    /// filename has no hyphen to split on.
    pub province: String,
    pub town: Option<String>,
    pub block: Option<u32>,
}

/// Derive province/town/block from a release-asset filename.
///
/// Pure and total: every input produces a `ParsedName`, with `town` and
/// `block` mutually exclusive. Only a trailing token that is entirely
/// numeric parses as a block; `"2a"` is a town name, `"02"` is block 2.
pub fn parse(filename: &str) -> ParsedName {
    let stem = match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    };
    match stem.rfind('-') {
        Some(split) => {
            let province = stem[..split].replace('-', " ");
            let trailing = &stem[split + 1..];
            match trailing.parse::<u32>() {
                Ok(block) => ParsedName {
                    province,
                    town: None,
                    block: Some(block),
                },
                Err(_) => ParsedName {
                    province,
                    town: Some(trailing.to_string()),
                    block: None,
                },
            }
        }
        None => ParsedName {
            province: String::new(),
            town: Some(stem.to_string()),
            block: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_trailing_token_is_a_block() {
        let parsed = parse("city-power-12.ics");
        assert_eq!(parsed.province, "city power");
        assert_eq!(parsed.block, Some(12));
        assert_eq!(parsed.town, None);
    }

    #[test]
    fn non_numeric_trailing_token_is_a_town() {
        let parsed = parse("western-cape-town-two.ics");
        assert_eq!(parsed.province, "western cape town");
        assert_eq!(parsed.town.as_deref(), Some("two"));
        assert_eq!(parsed.block, None);
    }

    #[test]
    fn multi_word_province_keeps_all_leading_segments() {
        let parsed = parse("kwazulu-natal-durban.ics");
        assert_eq!(parsed.province, "kwazulu natal");
        assert_eq!(parsed.town.as_deref(), Some("durban"));
    }

    #[test]
    fn zero_padded_token_parses_as_block() {
        let parsed = parse("gauteng-02.ics");
        assert_eq!(parsed.block, Some(2));
        assert_eq!(parsed.town, None);
    }

    #[test]
    fn mixed_alphanumeric_token_is_a_town() {
        let parsed = parse("gauteng-2a.ics");
        assert_eq!(parsed.block, None);
        assert_eq!(parsed.town.as_deref(), Some("2a"));
    }

    #[test]
    fn block_zero_is_a_valid_block() {
        let parsed = parse("limpopo-0.ics");
        assert_eq!(parsed.block, Some(0));
        assert_eq!(parsed.town, None);
    }

    #[test]
    fn no_hyphen_yields_empty_province_and_stem_as_town() {
        let parsed = parse("johannesburg.ics");
        assert_eq!(parsed.province, "");
        assert_eq!(parsed.town.as_deref(), Some("johannesburg"));
        assert_eq!(parsed.block, None);
    }

    #[test]
    fn no_extension_still_splits_on_last_hyphen() {
        let parsed = parse("free-state-bethlehem");
        assert_eq!(parsed.province, "free state");
        assert_eq!(parsed.town.as_deref(), Some("bethlehem"));
    }

    #[test]
    fn empty_input_yields_empty_town() {
        let parsed = parse("");
        assert_eq!(parsed.province, "");
        assert_eq!(parsed.town.as_deref(), Some(""));
        assert_eq!(parsed.block, None);
    }

    #[test]
    fn every_all_digit_tail_maps_to_block() {
        for n in [0u32, 1, 7, 16, 99, 1234] {
            let parsed = parse(&format!("eastern-cape-{n}.ics"));
            assert_eq!(parsed.block, Some(n), "block {n}");
            assert_eq!(parsed.town, None);
            assert_eq!(parsed.province, "eastern cape");
        }
    }
}
