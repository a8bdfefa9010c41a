use crate::models::FacilityRecord;

/// Return the catalog entry whose name exactly equals `name`, or the
/// catalog's first entry when nothing matches. Used after successful
/// synthesis: the model is told to name a clinic from the provided list,
/// but its output is never trusted to have done so.
///
/// Callers supply a non-empty catalog (`FacilityCatalog` guarantees this;
/// loaders reject empty input).
pub fn resolve_by_name<'a>(name: &str, catalog: &'a [FacilityRecord]) -> &'a FacilityRecord {
    catalog
        .iter()
        .find(|f| f.name == name)
        .unwrap_or(&catalog[0])
}

/// Return the first catalog entry whose location exactly equals
/// `location`, or the catalog's first entry when nothing matches. Used by
/// fallback synthesis against the intake's reported location.
pub fn resolve_by_location<'a>(
    location: &str,
    catalog: &'a [FacilityRecord],
) -> &'a FacilityRecord {
    catalog
        .iter()
        .find(|f| f.location == location)
        .unwrap_or(&catalog[0])
}
