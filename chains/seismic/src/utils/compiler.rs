use crate::error::DeployError;
use ethers::abi::Abi;
use ethers::types::Bytes;
use ethers_solc::artifacts::{CompilerInput, Optimizer, Settings, Source, Sources};
use ethers_solc::Solc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const OPTIMIZER_RUNS: usize = 200;

#[derive(Debug, Clone)]
pub struct CompiledContract {
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// Turns a Solidity source file into deployable artifacts.
pub trait ContractCompiler: Send + Sync {
    fn compile(&self, source_path: &Path, contract_name: &str)
        -> Result<CompiledContract, DeployError>;
}

/// Compiles with a `solc` binary, `SOLC_PATH` or `solc` from `PATH`.
#[derive(Debug, Clone)]
pub struct SolcCompiler {
    solc: Solc,
}

impl Default for SolcCompiler {
    fn default() -> Self {
        Self {
            solc: Solc::default(),
        }
    }
}

impl SolcCompiler {
    fn input_for(file_name: &str, content: String) -> Result<CompilerInput, DeployError> {
        let mut sources = Sources::new();
        sources.insert(PathBuf::from(file_name), Source::new(content));

        let mut settings = Settings::default();
        settings.optimizer = Optimizer {
            enabled: Some(true),
            runs: Some(OPTIMIZER_RUNS),
            details: None,
        };
        settings.output_selection = BTreeMap::from([(
            "*".to_string(),
            BTreeMap::from([(
                "*".to_string(),
                vec!["abi".to_string(), "evm.bytecode".to_string()],
            )]),
        )])
        .into();

        let mut input = CompilerInput::with_sources(sources)
            .into_iter()
            .next()
            .ok_or_else(|| DeployError::Compilation {
                diagnostics: vec![format!("{} is not a Solidity source", file_name)],
            })?;
        input.settings = settings;
        Ok(input)
    }
}

impl ContractCompiler for SolcCompiler {
    fn compile(
        &self,
        source_path: &Path,
        contract_name: &str,
    ) -> Result<CompiledContract, DeployError> {
        info!("Compiling contract: {:?}", source_path);

        let content = fs::read_to_string(source_path).map_err(|e| DeployError::Io {
            path: source_path.display().to_string(),
            msg: e.to_string(),
        })?;
        let file_name = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DeployError::Io {
                path: source_path.display().to_string(),
                msg: "invalid contract file name".to_string(),
            })?
            .to_string();

        let input = Self::input_for(&file_name, content)?;
        let output = self
            .solc
            .compile_exact(&input)
            .map_err(|e| DeployError::Compilation {
                diagnostics: vec![e.to_string()],
            })?;

        let diagnostics: Vec<String> = output
            .errors
            .iter()
            .filter(|e| e.severity.is_error())
            .map(|e| e.formatted_message.clone().unwrap_or_else(|| e.message.clone()))
            .collect();
        if !diagnostics.is_empty() {
            return Err(DeployError::Compilation { diagnostics });
        }

        let not_found = || DeployError::ContractNotFound {
            contract: contract_name.to_string(),
        };
        let contract = output
            .contracts
            .get(&file_name)
            .and_then(|contracts| contracts.get(contract_name))
            .ok_or_else(not_found)?;

        let abi = contract
            .abi
            .as_ref()
            .map(|lossless| lossless.abi.clone())
            .ok_or_else(not_found)?;
        let bytecode = contract
            .evm
            .as_ref()
            .and_then(|evm| evm.bytecode.as_ref())
            .and_then(|bytecode| bytecode.object.as_bytes())
            .cloned()
            .ok_or_else(not_found)?;

        Ok(CompiledContract { abi, bytecode })
    }
}
