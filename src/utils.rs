use chrono::Utc;
use std::path::PathBuf;

/// The name of the formcore data folder under the user's home directory.
pub const FORMCORE_FOLDER: &str = ".formcore";

/// Path to the formcore data folder (`~/.formcore`).
#[must_use]
pub fn formcore_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(FORMCORE_FOLDER))
}

/// Current timestamp in the store's format ("2024-03-15 10:22:01", UTC).
#[must_use]
pub fn now_store_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_store_timestamp_format() {
        let ts = now_store_timestamp();
        assert_eq!(ts.len(), 19);
        let date = ts.split_whitespace().next().unwrap();
        assert!(chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_formcore_dir_under_home() {
        if let Some(dir) = formcore_dir() {
            assert!(dir.ends_with(FORMCORE_FOLDER));
        }
    }
}
