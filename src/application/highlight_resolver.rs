// Highlight resolver - maps vehicle addresses to grid cells
use crate::domain::fleet::FleetSnapshot;
use crate::domain::highlight::HighlightSet;
use crate::domain::region::RegionRegistry;

/// Marker preceding the province name in feed addresses ("จ." = province).
pub const PROVINCE_MARKER: &str = "จ.";

/// Extracts the province token from a free-text address: the text after
/// the first occurrence of `marker`, with surrounding whitespace trimmed.
///
/// Returns `None` when the marker is absent or nothing but whitespace
/// follows it. Text after a second marker is left in the token and will
/// simply miss the registry lookup.
pub fn extract_province_token<'a>(address: &'a str, marker: &str) -> Option<&'a str> {
    let start = address.find(marker)? + marker.len();
    let token = address[start..].trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Resolves a snapshot into the set of grid cells to mark.
///
/// Per vehicle: extract the province token, look it up by name, mark the
/// region's cell. Any miss along the way skips that vehicle silently; the
/// first vehicle in snapshot order wins a contested cell.
pub fn resolve_highlights(snapshot: &FleetSnapshot, registry: &RegionRegistry) -> HighlightSet {
    let mut highlights = HighlightSet::default();
    for vehicle in &snapshot.vehicles {
        let Some(token) = extract_province_token(&vehicle.address, PROVINCE_MARKER) else {
            continue;
        };
        let Some(region) = registry.lookup_by_name(token) else {
            continue;
        };
        highlights.mark(region.pos, &vehicle.display_name);
    }
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::{EngineStatus, Vehicle};
    use crate::domain::region::Position;

    fn vehicle(name: &str, address: &str) -> Vehicle {
        Vehicle {
            gps_id: "67006067".to_string(),
            display_name: name.to_string(),
            latitude: 19.9,
            longitude: 99.8,
            speed: 60,
            engine: EngineStatus::On,
            address: address.to_string(),
            external_batt: "12.6".to_string(),
            gps_signal: "F".to_string(),
            gprs_signal: "O".to_string(),
            last_update: "2026-02-01 12:00:00".to_string(),
        }
    }

    fn snapshot(vehicles: Vec<Vehicle>) -> FleetSnapshot {
        FleetSnapshot {
            timestamp: "2026-02-01 12:00:05".to_string(),
            vehicles,
        }
    }

    #[test]
    fn token_after_marker_is_trimmed() {
        assert_eq!(
            extract_province_token("ต.เวียง อ.เมือง จ. เชียงราย ", "จ."),
            Some("เชียงราย")
        );
    }

    #[test]
    fn missing_marker_yields_none() {
        assert_eq!(extract_province_token("ถนนพหลโยธิน กม. 12", "จ."), None);
    }

    #[test]
    fn marker_at_end_of_string_yields_none() {
        assert_eq!(extract_province_token("อ.เมือง จ.", "จ."), None);
        assert_eq!(extract_province_token("อ.เมือง จ.   ", "จ."), None);
    }

    #[test]
    fn second_marker_stays_in_the_token() {
        // The raw remainder keeps the second marker; lookup will miss it.
        assert_eq!(
            extract_province_token("จ.เชียงราย จ.พะเยา", "จ."),
            Some("เชียงราย จ.พะเยา")
        );
    }

    #[test]
    fn address_with_known_province_marks_its_cell() {
        let registry = RegionRegistry::shared();
        let snap = snapshot(vec![vehicle("คมแฝก", "บ้านเลขที่ 1 จ.เชียงราย")]);

        let highlights = resolve_highlights(&snap, registry);
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights.vehicle_at(2, 1), Some("คมแฝก"));
    }

    #[test]
    fn unknown_province_and_missing_marker_contribute_nothing() {
        let registry = RegionRegistry::shared();
        let snap = snapshot(vec![
            vehicle("คมแฝก", "อ.เมือง จ.อาณาจักรล้านนา"),
            vehicle("บินหลาดง", "ไม่มีเครื่องหมายจังหวัด"),
        ]);

        let highlights = resolve_highlights(&snap, registry);
        assert!(highlights.is_empty());
    }

    #[test]
    fn first_vehicle_in_snapshot_order_wins_a_shared_cell() {
        let registry = RegionRegistry::shared();
        let snap = snapshot(vec![
            vehicle("คมแฝก", "อ.แม่สาย จ.เชียงราย"),
            vehicle("เพลิงพระนาง", "อ.เมือง จ.เชียงราย"),
        ]);

        let highlights = resolve_highlights(&snap, registry);
        assert_eq!(highlights.len(), 1);
        let pos = registry.lookup_by_name("เชียงราย").unwrap().pos;
        assert_eq!(pos, Position { row: 2, col: 1 });
        assert_eq!(highlights.vehicle_at(pos.row, pos.col), Some("คมแฝก"));
    }

    #[test]
    fn vehicles_in_different_provinces_mark_distinct_cells() {
        let registry = RegionRegistry::shared();
        let snap = snapshot(vec![
            vehicle("คมแฝก", "จ.เชียงราย"),
            vehicle("บินหลาดง", "อ.หาดใหญ่ จ.สงขลา"),
        ]);

        let highlights = resolve_highlights(&snap, registry);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights.vehicle_at(25, 4), Some("บินหลาดง"));
    }
}
