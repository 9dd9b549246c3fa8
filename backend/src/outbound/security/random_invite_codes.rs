//! Invite codes drawn from the operating system's RNG.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::InviteCode;
use crate::domain::ports::InviteCodeSource;

/// Produces 8-character hexadecimal invite codes from four random bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomInviteCodes;

impl InviteCodeSource for RandomInviteCodes {
    fn next_code(&self) -> InviteCode {
        let mut bytes = [0_u8; 4];
        OsRng.fill_bytes(&mut bytes);
        InviteCode::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_upper_hex_of_fixed_length() {
        let code = RandomInviteCodes.next_code();

        assert_eq!(code.as_str().len(), 8);
        assert!(
            code.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn consecutive_codes_rarely_repeat() {
        let codes: HashSet<String> = (0..64)
            .map(|_| RandomInviteCodes.next_code().as_str().to_owned())
            .collect();

        assert!(codes.len() > 60);
    }
}
