//! Rebinding service
//!
//! When an image is converted, templates may still know it under a name of
//! their own (`gatk_docker → lab/gatk:2024-v1-abcd1234`). Those keys are
//! re-pointed at the new locator together with the reference's own key.

use crate::domain::entities::RegistryDocument;
use crate::domain::value_objects::{ImageReference, LogicalImageKey};

/// Keys other than the reference's own that must follow a conversion of
/// `reference`: keys whose locator is the reference itself, or the locator
/// currently recorded under the reference's own key.
pub fn aliases_for(document: &RegistryDocument, reference: &ImageReference) -> Vec<LogicalImageKey> {
    let own_key = LogicalImageKey::from(reference);
    let mut aliases = document.keys_with_locator(&reference.to_string());

    if let Some(current) = document.get(&own_key) {
        aliases.extend(document.keys_with_locator(&current.locator));
    }

    aliases.sort();
    aliases.dedup();
    aliases.retain(|key| key != &own_key);
    aliases
}
