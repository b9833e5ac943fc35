use crate::core::error::LookupError;
use crate::core::types::{ModuleScope, ModuleSelector};
use crate::ports::OctaneApi;
use tracing::{debug, info};

/// Maps the application-module argument to a test scope: all tests,
/// unassigned tests, or one product area (optionally with descendants).
pub(crate) async fn resolve_application_module(
    api: &dyn OctaneApi,
    arg: Option<&str>,
    use_strict: bool,
) -> Result<ModuleScope, LookupError> {
    let raw = match arg {
        None | Some("") => {
            info!("Will consider all the tests for the update");
            return Ok(ModuleScope::AllTests);
        }
        Some(raw) => raw,
    };

    let (selector, strict) = match raw.parse::<u64>() {
        Ok(id) => {
            debug!("Using the application module id:{}", id);
            (ModuleSelector::Id(id), use_strict)
        }
        Err(_) => match raw.to_ascii_uppercase().as_str() {
            "UNASSIGNED" => {
                info!("Will only consider tests which are not assigned to an application module");
                return Ok(ModuleScope::UnassignedTests);
            }
            "ALL" => {
                info!("Will consider all the tests for the update");
                return Ok(ModuleScope::AllTests);
            }
            // Matching the root area only makes sense together with its
            // descendants, so strict mode is disabled for it.
            "ROOT" => {
                info!("Will consider all the tests which have at least one application module assigned");
                (ModuleSelector::Root, false)
            }
            _ => return Err(LookupError::InvalidModuleArgument(raw.to_string())),
        },
    };

    let mut modules = api.find_application_modules(&selector).await?;
    match modules.len() {
        0 => Err(LookupError::NotFound {
            entity: "application module",
            field: selector.field(),
            value: selector.value(),
        }),
        1 => {
            let mut module = modules.remove(0);
            if strict {
                info!(
                    "Will only consider tests assigned to the application module '{}' (id:{}) (not including descendants)",
                    module.name, module.id
                );
            } else {
                info!(
                    "Will only consider tests assigned to the application module '{}' (id:{}) and its descendants",
                    module.name, module.id
                );
                module.path.push('*');
            }
            debug!("Application module path: {}", module.path);
            Ok(ModuleScope::Module(module))
        }
        _ => Err(LookupError::Ambiguous {
            entity: "application module",
            field: selector.field(),
            value: selector.value(),
        }),
    }
}
