use crate::models::wanted_person::WantedPerson;

/// Keeps the records matching every supplied filter.
///
/// Both filters are case-insensitive substring matches. A record whose field
/// is absent never matches a filter on that field. Blank filters are ignored,
/// and with no filters the input is returned unchanged.
pub fn filter_persons(
    items: Vec<WantedPerson>,
    station: Option<&str>,
    alias: Option<&str>,
) -> Vec<WantedPerson> {
    let station = normalized_filter(station);
    let alias = normalized_filter(alias);

    if station.is_none() && alias.is_none() {
        return items;
    }

    items
        .into_iter()
        .filter(|person| {
            field_matches(person.police_station.as_deref(), station.as_deref())
                && field_matches(person.alias.as_deref(), alias.as_deref())
        })
        .collect()
}

fn normalized_filter(filter: Option<&str>) -> Option<String> {
    filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
}

fn field_matches(field: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field.is_some_and(|value| value.to_lowercase().contains(needle)),
    }
}
