//! Utility functions and helpers

/// Turn a commodity name into a safe file stem
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            ' ' | '/' => Some('_'),
            '(' | ')' => None,
            _ => Some(c),
        })
        .collect()
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(safe_file_stem("Copper (Cu)"), "Copper_Cu");
        assert_eq!(safe_file_stem("WCS Differential"), "WCS_Differential");
        assert_eq!(safe_file_stem("USD/MT"), "USD_MT");
    }
}
