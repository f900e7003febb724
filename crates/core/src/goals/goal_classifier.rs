use crate::assets::{AssetClass, AssetDefinition};
use crate::goals::Goal;

/// Maps an asset's class and sub-class to the goal it serves.
///
/// Bonds split on duration: short-dated paper is protection, medium and long
/// duration is security. A bond with any other sub-class is treated as growth.
pub fn classify(class: AssetClass, sub_class: &str) -> Goal {
    match class {
        AssetClass::Stock | AssetClass::Commodity | AssetClass::Crypto => Goal::Growth,
        AssetClass::Cash => Goal::Protection,
        AssetClass::Bond => match sub_class.trim().to_ascii_lowercase().as_str() {
            "short" => Goal::Protection,
            "medium" | "long" => Goal::Security,
            _ => Goal::Growth,
        },
    }
}

pub fn classify_definition(definition: &AssetDefinition) -> Goal {
    classify(definition.class, &definition.sub_class)
}
