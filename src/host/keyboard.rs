use serde::{Deserialize, Serialize};

/// Keys the handlers press through the host. Codes are Win32 virtual-key codes,
/// which is what the host's `click_key` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
}

impl Key {
    pub fn code(self) -> i32 {
        match self {
            Key::Escape => 27,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_is_vk_27() {
        assert_eq!(Key::Escape.code(), 27);
    }

    #[test]
    fn keys_deserialize_from_snake_case() {
        #[derive(Deserialize)]
        struct Holder {
            key: Key,
        }
        let h: Holder = toml::from_str("key = \"escape\"").unwrap();
        assert_eq!(h.key, Key::Escape);
    }
}
