/// Parse a 1-based page selection like `"3"` or `"1,3-5"` into sorted,
/// deduplicated 0-based page indices of a document with `page_count` pages.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (first, last) = match part.split_once('-') {
            Some((start, end)) => (page_number(start, page_count)?, page_number(end, page_count)?),
            None => {
                let page = page_number(part, page_count)?;
                (page, page)
            }
        };
        if last < first {
            return Err(format!("descending page range: '{part}'"));
        }
        pages.extend(first - 1..last);
    }

    if pages.is_empty() {
        return Err(format!("no pages selected by '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("1", 5).unwrap(), vec![0]);
        assert_eq!(parse_page_range("5", 5).unwrap(), vec![4]);
    }

    #[test]
    fn ranges_and_lists() {
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            parse_page_range("1-3,7,10-12", 12).unwrap(),
            vec![0, 1, 2, 6, 9, 10, 11]
        );
    }

    #[test]
    fn overlaps_are_merged() {
        assert_eq!(parse_page_range("3,1-3,2", 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parse_page_range(" 1 , 3 - 5 ", 5).unwrap(), vec![0, 2, 3, 4]);
    }

    #[test]
    fn page_zero_invalid() {
        assert!(parse_page_range("0", 5).unwrap_err().contains("invalid"));
    }

    #[test]
    fn page_beyond_document() {
        assert!(parse_page_range("2-6", 5).unwrap_err().contains("exceeds"));
    }

    #[test]
    fn descending_range_rejected() {
        assert!(parse_page_range("4-2", 5).unwrap_err().contains("descending"));
    }

    #[test]
    fn garbage_rejected() {
        assert!(parse_page_range("one", 5).is_err());
        assert!(parse_page_range(",", 5).unwrap_err().contains("no pages"));
    }
}
