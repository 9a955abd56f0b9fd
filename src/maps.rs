//! Builds Google Maps deep links
//!
//! Every location is form-urlencoded on its own before being inserted into a link, so that spaces, control characters
//! and reserved characters (`&`, `=`, `#`, `|`...) of a free-text location can never alter the structure of the link.

use once_cell::sync::Lazy;
use url::Url;
use url::form_urlencoded::byte_serialize;

static SEARCH_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.google.com/maps/search/").expect("hard-coded URL is valid"));
static DIRECTIONS_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.google.com/maps/dir/").expect("hard-coded URL is valid"));

/// Separates waypoints in a directions link. A literal `|` inside a location is encoded as `%7C`.
pub const WAYPOINT_SEPARATOR: &str = "|";

/// The travel mode used for itineraries
pub const TRAVEL_MODE: &str = "driving";

/// Form-urlencodes a location, so that it can be used as (part of) a single query value
pub fn encode(location: &str) -> String {
    byte_serialize(location.as_bytes()).collect()
}

/// A "search this place" link
pub fn search_url(location: &str) -> Url {
    let mut url = SEARCH_BASE.clone();
    url.set_query(Some(&format!("api=1&query={}", encode(location))));
    url
}

/// A link that shows an itinerary through every location, in order.
///
/// * no location: there is nothing to show, and `None` is returned
/// * one location: a [`search_url`] for it
/// * more: directions from the first to the last location, stopping by every location in between
pub fn itinerary_url<S: AsRef<str>>(locations: &[S]) -> Option<Url> {
    let (origin, destination) = match locations {
        [] => return None,
        [single] => return Some(search_url(single.as_ref())),
        [first, .., last] => (first.as_ref(), last.as_ref()),
    };

    let mut query = format!("api=1&origin={}&destination={}", encode(origin), encode(destination));

    let intermediate = &locations[1..locations.len() - 1];
    if intermediate.is_empty() == false {
        let waypoints: Vec<String> = intermediate.iter()
            .map(|loc| encode(loc.as_ref()))
            .collect();
        query.push_str("&waypoints=");
        query.push_str(&waypoints.join(WAYPOINT_SEPARATOR));
    }
    query.push_str("&travelmode=");
    query.push_str(TRAVEL_MODE);

    let mut url = DIRECTIONS_BASE.clone();
    url.set_query(Some(&query));
    Some(url)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn param(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn no_location_no_link() {
        let empty: [&str; 0] = [];
        assert_eq!(itinerary_url(&empty), None);
    }

    #[test]
    fn single_location() {
        let url = itinerary_url(&["Piazza del Duomo, Milano"]).unwrap();
        assert_eq!(url.path(), "/maps/search/");
        assert!(url.as_str().contains(&encode("Piazza del Duomo, Milano")));
        assert_eq!(param(&url, "query").as_deref(), Some("Piazza del Duomo, Milano"));
        assert_eq!(param(&url, "waypoints"), None);
        assert_eq!(url, search_url("Piazza del Duomo, Milano"));
    }

    #[test]
    fn two_locations_have_no_waypoints() {
        let url = itinerary_url(&["Home", "Office"]).unwrap();
        assert_eq!(url.path(), "/maps/dir/");
        assert_eq!(param(&url, "origin").as_deref(), Some("Home"));
        assert_eq!(param(&url, "destination").as_deref(), Some("Office"));
        assert_eq!(param(&url, "waypoints"), None);
        assert_eq!(param(&url, "travelmode").as_deref(), Some("driving"));
    }

    #[test]
    fn three_locations() {
        let url = itinerary_url(&["A", "B", "C"]).unwrap();
        assert_eq!(param(&url, "origin").as_deref(), Some("A"));
        assert_eq!(param(&url, "destination").as_deref(), Some("C"));
        assert_eq!(param(&url, "waypoints").as_deref(), Some("B"));
    }

    #[test]
    fn waypoints_keep_their_order() {
        let url = itinerary_url(&["A", "B", "C", "D", "E"]).unwrap();
        assert_eq!(param(&url, "waypoints").as_deref(), Some("B|C|D"));
    }

    #[test]
    fn separator_inside_a_location_is_escaped() {
        let url = itinerary_url(&["A", "Gym | Pool", "C"]).unwrap();
        let raw_waypoints = url.query().unwrap()
            .split('&')
            .find(|kv| kv.starts_with("waypoints="))
            .unwrap()
            .trim_start_matches("waypoints=");
        assert_eq!(raw_waypoints.matches('|').count(), 0);
        assert!(raw_waypoints.contains("%7C"));
    }

    #[test]
    fn reserved_characters_cannot_inject_parameters() {
        let sneaky = "Office&destination=Elsewhere#frag\n";
        let url = itinerary_url(&[sneaky, "Home"]).unwrap();
        assert_eq!(param(&url, "origin").as_deref(), Some(sneaky));
        assert_eq!(param(&url, "destination").as_deref(), Some("Home"));
        assert_eq!(url.query_pairs().filter(|(k, _)| k == "destination").count(), 1);
        assert_eq!(url.fragment(), None);
    }
}
