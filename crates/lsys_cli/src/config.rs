// Copyright © Spelldawn 2021-present

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//    https://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loads and saves `lsys_core::config::SolverConfig` as JSON
//! (`SPEC_FULL.md` §2's ambient configuration stack), following the
//! `from_file`/`to_file` pattern used by `optillm-rs`'s `cli::config`.

use std::fs;
use std::path::Path;

use lsys_core::config::SolverConfig;
use with_error::WithError;

use crate::error::{CliError, CliResult};

pub fn load(path: impl AsRef<Path>) -> CliResult<SolverConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_error(|| format!("failed to read config file {:?}", path.as_ref()))
        .map_err(|e| CliError::Config(e.to_string()))?;
    serde_json::from_str(&content)
        .with_error(|| format!("failed to parse config file {:?}", path.as_ref()))
        .map_err(|e| CliError::Config(e.to_string()))
}

pub fn save(config: &SolverConfig, path: impl AsRef<Path>) -> CliResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let dir = std::env::temp_dir().join(format!("lsys_cli_config_test_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.json");

        let config = SolverConfig::default();
        save(&config, &path).expect("save");
        let loaded = load(&path).expect("load");

        assert_eq!(loaded.max_derivation_steps, config.max_derivation_steps);
        assert_eq!(loaded.rng_seed, config.rng_seed);
        fs::remove_file(&path).ok();
        fs::remove_dir(&dir).ok();
    }
}
