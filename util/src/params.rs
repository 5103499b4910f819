//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (AV_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$AV_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    // Get the params dir
    let mut path = crate::host::get_av_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_from_path(path)
}

/// Load a parameter file from an explicit path.
pub fn load_from_path<P, T>(path: T) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    T: AsRef<Path>
{
    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e))
    };

    from_str(params_str.as_str())
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestParams {
        period_s: f64,
        name: String
    }

    #[test]
    fn test_from_str() {
        let p: TestParams = from_str("period_s = 0.02\nname = \"ring\"").unwrap();
        assert_eq!(p, TestParams { period_s: 0.02, name: String::from("ring") });

        match from_str::<TestParams>("period_s = \"fast\"") {
            Err(LoadError::DeserialiseError(_)) => (),
            r => panic!("Expected a deserialise error, got {:?}", r)
        }
    }

    #[test]
    fn test_missing_file() {
        match load_from_path::<TestParams, _>("/this/file/does/not/exist.toml") {
            Err(LoadError::FileLoadError(_)) => (),
            r => panic!("Expected a file load error, got {:?}", r)
        }
    }
}
