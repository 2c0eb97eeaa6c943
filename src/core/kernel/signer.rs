use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Result type for signing operations
pub type SignatureResult = Result<SignedParams, ExchangeError>;

/// Parameters of a signed request, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    /// Timestamp (ms) the signature was computed for
    pub timestamp: u64,
    /// Sorted request string the digest was computed over
    pub canonical: String,
    /// Lower-case hex HMAC-SHA256 digest
    pub signature: String,
    /// All parameters in canonical order, `signature` last
    pub params: Vec<(String, String)>,
}

impl SignedParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Signer trait for request authentication
///
/// Implementations add their authentication fields to the method parameters
/// and return the complete, signed parameter set.
pub trait Signer: Send + Sync {
    /// Sign `params` for the given timestamp (milliseconds)
    fn sign_request(&self, params: &[(&str, &str)], timestamp: u64) -> SignatureResult;
}

/// HMAC-SHA256 signer over the alphabetically sorted request string
///
/// Signing procedure:
/// - add `key` and `timestamp` to the method parameters;
/// - sort everything by parameter name and form-encode it as `k1=v1&k2=v2...`;
/// - sign that string with the API secret and attach the hex digest as `signature`.
pub struct HmacSigner {
    api_key: String,
    secret_key: String,
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer; both credentials are required
    pub fn new(api_key: String, secret_key: String) -> Result<Self, ExchangeError> {
        if api_key.is_empty() {
            return Err(ExchangeError::MissingCredentials(
                "API key is empty".to_string(),
            ));
        }
        if secret_key.is_empty() {
            return Err(ExchangeError::MissingCredentials(
                "API secret is empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            secret_key,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn generate_signature(&self, canonical: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::Other(format!("Failed to create HMAC: {}", e)))?;
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl Signer for HmacSigner {
    fn sign_request(&self, params: &[(&str, &str)], timestamp: u64) -> SignatureResult {
        let mut sorted: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        // Authentication fields always win over caller parameters of the same name
        sorted.remove("signature");
        sorted.insert("key".to_string(), self.api_key.clone());
        sorted.insert("timestamp".to_string(), timestamp.to_string());

        let canonical = canonical_string(&sorted)?;
        let signature = self.generate_signature(&canonical)?;

        let mut signed: Vec<(String, String)> = sorted.into_iter().collect();
        signed.push(("signature".to_string(), signature.clone()));

        Ok(SignedParams {
            timestamp,
            canonical,
            signature,
            params: signed,
        })
    }
}

/// Form-encode parameters in key order
pub fn canonical_string(params: &BTreeMap<String, String>) -> Result<String, ExchangeError> {
    serde_urlencoded::to_string(params).map_err(|e| {
        ExchangeError::SerializationError(format!("Failed to encode request string: {}", e))
    })
}

/// Current local time in milliseconds
pub fn get_timestamp() -> Result<u64, ExchangeError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .map_err(|e| ExchangeError::Other(format!("System time error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_TIMESTAMP: u64 = 1_635_423_044_469;
    const FIXTURE_SIGNATURE: &str =
        "6dc08971130347d14e37b9ff0a9e989611d7d9baeba456e810015812a28f5984";

    fn fixture_signer() -> HmacSigner {
        HmacSigner::new("abc".to_string(), "xyz".to_string()).unwrap()
    }

    #[test]
    fn test_reference_signature() {
        let params = [
            ("symbol", "EPIC-002_BTC-000"),
            ("amount", "5"),
            ("price", "0.00006000"),
            ("side", "1"),
        ];
        let signed = fixture_signer()
            .sign_request(&params, FIXTURE_TIMESTAMP)
            .unwrap();

        assert_eq!(
            signed.canonical,
            "amount=5&key=abc&price=0.00006000&side=1&symbol=EPIC-002_BTC-000&timestamp=1635423044469"
        );
        assert_eq!(signed.signature, FIXTURE_SIGNATURE);
        assert_eq!(signed.get("signature"), Some(FIXTURE_SIGNATURE));
        assert_eq!(signed.get("key"), Some("abc"));
        assert_eq!(signed.get("timestamp"), Some("1635423044469"));
    }

    #[test]
    fn test_canonical_string_ignores_insertion_order() {
        let signer = fixture_signer();
        let forward = [
            ("amount", "5"),
            ("price", "0.00006000"),
            ("side", "1"),
            ("symbol", "EPIC-002_BTC-000"),
        ];
        let mut reversed = forward;
        reversed.reverse();
        let shuffled = [forward[2], forward[0], forward[3], forward[1]];

        let a = signer.sign_request(&forward, FIXTURE_TIMESTAMP).unwrap();
        let b = signer.sign_request(&reversed, FIXTURE_TIMESTAMP).unwrap();
        let c = signer.sign_request(&shuffled, FIXTURE_TIMESTAMP).unwrap();

        assert_eq!(a.canonical, b.canonical);
        assert_eq!(a.canonical, c.canonical);
        assert_eq!(a.signature, c.signature);
        assert_eq!(a.params, b.params);
    }

    #[test]
    fn test_signed_params_order() {
        let signed = fixture_signer()
            .sign_request(&[("symbol", "VX_ETH-000")], FIXTURE_TIMESTAMP)
            .unwrap();
        let keys: Vec<&str> = signed.params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["key", "symbol", "timestamp", "signature"]);
    }

    #[test]
    fn test_auth_fields_override_caller_params() {
        let signed = fixture_signer()
            .sign_request(
                &[("key", "other"), ("timestamp", "1"), ("signature", "forged")],
                FIXTURE_TIMESTAMP,
            )
            .unwrap();
        assert_eq!(signed.get("key"), Some("abc"));
        assert_eq!(signed.get("timestamp"), Some("1635423044469"));
        assert_eq!(signed.params.iter().filter(|(k, _)| k == "signature").count(), 1);
        assert_ne!(signed.get("signature"), Some("forged"));
    }

    #[test]
    fn test_values_are_form_encoded() {
        let mut params = BTreeMap::new();
        params.insert("b".to_string(), "x y&z".to_string());
        params.insert("a".to_string(), "1".to_string());
        assert_eq!(canonical_string(&params).unwrap(), "a=1&b=x+y%26z");
    }

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(
            HmacSigner::new(String::new(), "xyz".to_string()),
            Err(ExchangeError::MissingCredentials(_))
        ));
        assert!(matches!(
            HmacSigner::new("abc".to_string(), String::new()),
            Err(ExchangeError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let other = HmacSigner::new("abc".to_string(), "XYZ".to_string()).unwrap();
        let params = [("symbol", "EPIC-002_BTC-000")];
        let a = fixture_signer().sign_request(&params, FIXTURE_TIMESTAMP).unwrap();
        let b = other.sign_request(&params, FIXTURE_TIMESTAMP).unwrap();
        assert_eq!(a.canonical, b.canonical);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let debug = format!("{:?}", fixture_signer());
        assert!(!debug.contains("xyz"));
        assert!(!debug.contains("abc"));
    }
}
