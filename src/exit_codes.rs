//! Exit code constants for the clouduct CLI.
//!
//! One code per pipeline stage:
//! - 0: Success
//! - 1: User error (bad args, unknown template)
//! - 2: Precondition failure (SSH identity, bundled assets)
//! - 3: Fetch failure (template clone or promotion)
//! - 4: Substitution failure
//! - 5: Staging failure
//! - 6: Config write failure
//! - 7: Provisioning handoff failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown template, or unreadable templates config.
pub const USER_ERROR: i32 = 1;

/// Precondition failure: missing SSH identity or missing bundled asset.
pub const PRECONDITION_FAILURE: i32 = 2;

/// Fetch failure: template clone or working-directory materialization errors.
pub const FETCH_FAILURE: i32 = 3;

/// Substitution failure: a skeleton file could not be read or rewritten.
pub const SUBSTITUTION_FAILURE: i32 = 4;

/// Staging failure: a resolved asset could not be copied into place.
pub const STAGE_FAILURE: i32 = 5;

/// Config write failure: the provisioning config could not be written.
pub const CONFIG_WRITE_FAILURE: i32 = 6;

/// Provisioning handoff failure: clouduct-tf could not be run or exited non-zero.
pub const PROVISION_FAILURE: i32 = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            PRECONDITION_FAILURE,
            FETCH_FAILURE,
            SUBSTITUTION_FAILURE,
            STAGE_FAILURE,
            CONFIG_WRITE_FAILURE,
            PROVISION_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_match_documented_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(PRECONDITION_FAILURE, 2);
        assert_eq!(FETCH_FAILURE, 3);
        assert_eq!(SUBSTITUTION_FAILURE, 4);
        assert_eq!(STAGE_FAILURE, 5);
        assert_eq!(CONFIG_WRITE_FAILURE, 6);
        assert_eq!(PROVISION_FAILURE, 7);
    }
}
