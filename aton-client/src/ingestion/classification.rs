//! Total mapping from structural AtoN record kinds to external type tags.
//!
//! Classification never blocks delivery: unrecognized kinds map to the empty
//! tag and the record is still published.

/// Tag for kinds outside the recognized AtoN taxonomy.
pub const TAG_UNCLASSIFIED: &str = "";

/// The fixed taxonomy table. Explicit and total: every input maps somewhere.
pub fn type_tag(kind: &str) -> &'static str {
    match kind {
        "BeaconCardinal" => "beacon_cardinal",
        "BeaconIsolatedDanger" => "beacon_isolated_danger",
        "BeaconLateral" => "beacon_lateral",
        "BeaconSafeWater" => "beacon_safe_water",
        "BeaconSpecialPurposeGeneral" => "beacon_special_purpose",
        "BuoyCardinal" => "buoy_cardinal",
        "BuoyInstallation" => "buoy_installation",
        "BuoyIsolatedDanger" => "buoy_isolated_danger",
        "BuoyLateral" => "buoy_lateral",
        "BuoySafeWater" => "buoy_safe_water",
        "BuoySpecialPurposeGeneral" => "buoy_special_purpose",
        "Lighthouse" => "lighthouse",
        "LightVessel" => "light_vessel",
        "VirtualAisAidToNavigation" => "virtual_ais_aid_to_navigation",
        _ => TAG_UNCLASSIFIED,
    }
}
