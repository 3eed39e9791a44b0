//! Lightweight input validation helpers. Keep logic minimal and deterministic.

use std::time::SystemTime;

use crate::StoreError;

/// Smallest group the directory accepts: a personal chat.
pub const MIN_GROUP_SIZE: usize = 2;

/// Validate the number of users handed to group creation.
pub fn validate_group_size(len: usize) -> Result<(), StoreError> {
    if len < MIN_GROUP_SIZE {
        return Err(StoreError::InvalidGroupSize(len));
    }
    Ok(())
}

/// Validate a 1-indexed rank used by the k-th most recent lookup.
pub fn validate_rank(k: usize) -> Result<(), StoreError> {
    if k == 0 {
        return Err(StoreError::InvalidRank);
    }
    Ok(())
}

/// True when `t` lies strictly inside `(start, end)`; both bounds excluded.
pub fn in_open_window(t: SystemTime, start: SystemTime, end: SystemTime) -> bool {
    start < t && t < end
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn group_size_validation() {
        assert!(validate_group_size(2).is_ok());
        assert!(validate_group_size(5).is_ok());
        assert_eq!(validate_group_size(1), Err(StoreError::InvalidGroupSize(1)));
        assert_eq!(validate_group_size(0), Err(StoreError::InvalidGroupSize(0)));
    }

    #[test]
    fn rank_validation() {
        assert!(validate_rank(1).is_ok());
        assert_eq!(validate_rank(0), Err(StoreError::InvalidRank));
    }

    #[test]
    fn window_excludes_boundaries() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let end = SystemTime::UNIX_EPOCH + Duration::from_secs(20);
        assert!(!in_open_window(start, start, end));
        assert!(!in_open_window(end, start, end));
        assert!(in_open_window(start + Duration::from_millis(1), start, end));
        assert!(!in_open_window(start + Duration::from_secs(15), end, start));
    }
}
