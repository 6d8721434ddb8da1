//! Wi-Fi network payloads.
//!
//! The form takes a single `ssid,password` line. The encoded record is
//! always tagged WPA:
//!
//! ```text
//! WIFI:S:<ssid>;T:WPA;P:<password>;;
//! ```
//!
//! Open and WEP networks are not supported. Special characters in the SSID
//! or password are passed through unescaped.

/// Network name and password split from the form's single input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl WifiCredentials {
    /// Split `ssid,password` on commas.
    ///
    /// Without a comma the whole input becomes the SSID and the password is
    /// empty. Pieces after the second comma are dropped, so a password that
    /// itself contains a comma is truncated.
    pub fn parse(input: &str) -> Self {
        let mut parts = input.split(',');
        let ssid = parts.next().unwrap_or_default().to_string();
        let password = match parts.next() {
            Some(password) => password.to_string(),
            None => {
                tracing::debug!(input_len = input.len(), "wifi input has no comma, password left empty");
                String::new()
            }
        };
        Self { ssid, password }
    }

    /// Render the `WIFI:` record.
    pub fn encode(&self) -> String {
        format!("WIFI:S:{};T:WPA;P:{};;", self.ssid, self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssid_and_password() {
        let creds = WifiCredentials::parse("MyNet,secret123");
        assert_eq!(creds.ssid, "MyNet");
        assert_eq!(creds.password, "secret123");
        assert_eq!(creds.encode(), "WIFI:S:MyNet;T:WPA;P:secret123;;");
    }

    #[test]
    fn test_missing_comma() {
        let creds = WifiCredentials::parse("MyNet");
        assert_eq!(creds.ssid, "MyNet");
        assert_eq!(creds.password, "");
        assert_eq!(creds.encode(), "WIFI:S:MyNet;T:WPA;P:;;");
    }

    #[test]
    fn test_extra_commas_dropped() {
        let creds = WifiCredentials::parse("Cafe,pa,ss");
        assert_eq!(creds.ssid, "Cafe");
        assert_eq!(creds.password, "pa");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(WifiCredentials::parse("").encode(), "WIFI:S:;T:WPA;P:;;");
    }

    #[test]
    fn test_no_trimming() {
        let creds = WifiCredentials::parse(" Home , pw ");
        assert_eq!(creds.ssid, " Home ");
        assert_eq!(creds.password, " pw ");
    }
}
