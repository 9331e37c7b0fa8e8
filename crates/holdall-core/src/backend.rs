use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// This enum defines the available upload backends. It's defined in core
/// because it's used in configuration and surfaced in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetBackend {
    Supabase,
    S3,
    Fs,
}

impl FromStr for AssetBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(AssetBackend::Supabase),
            "s3" => Ok(AssetBackend::S3),
            "fs" => Ok(AssetBackend::Fs),
            _ => Err(anyhow::anyhow!("Invalid asset backend: {}", s)),
        }
    }
}

impl Display for AssetBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetBackend::Supabase => write!(f, "supabase"),
            AssetBackend::S3 => write!(f, "s3"),
            AssetBackend::Fs => write!(f, "fs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("supabase".parse::<AssetBackend>().unwrap(), AssetBackend::Supabase);
        assert_eq!("S3".parse::<AssetBackend>().unwrap(), AssetBackend::S3);
        assert_eq!("fs".parse::<AssetBackend>().unwrap(), AssetBackend::Fs);
        assert!("nfs".parse::<AssetBackend>().is_err());
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [AssetBackend::Supabase, AssetBackend::S3, AssetBackend::Fs] {
            assert_eq!(backend.to_string().parse::<AssetBackend>().unwrap(), backend);
        }
    }
}
