use crate::core::error::LookupError;
use crate::core::types::{Release, ReleaseSelector};
use crate::ports::OctaneApi;
use tracing::{debug, info};

/// Resolves the release argument (id, name, or absent for the platform's
/// current release) to exactly one active release.
pub(crate) async fn resolve_release(
    api: &dyn OctaneApi,
    arg: Option<&str>,
) -> Result<Release, LookupError> {
    let selector = ReleaseSelector::from_arg(arg);
    debug!(
        "Getting release with the field {} equal to {}",
        selector.field(),
        selector.value()
    );

    let mut releases = api.find_releases(&selector).await?;
    match releases.len() {
        0 => Err(LookupError::NotFound {
            entity: "release",
            field: selector.field(),
            value: selector.value(),
        }),
        1 => {
            let release = releases.remove(0);
            if !release.is_active() {
                return Err(LookupError::InactiveRelease {
                    name: release.name,
                    id: release.id,
                });
            }
            info!(
                "Will add the release '{}' (id:{}) to the tests",
                release.name, release.id
            );
            Ok(release)
        }
        _ => Err(LookupError::Ambiguous {
            entity: "release",
            field: selector.field(),
            value: selector.value(),
        }),
    }
}
