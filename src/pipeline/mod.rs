//! Single-pass transformations over an entity collection
//!
//! Each entity is handled independently; non-fatal conditions are reported
//! as log warnings and counted, never returned as errors.

use log::{debug, warn};

use crate::domain::Entity;
use crate::geometry::{CenterSource, Point, best_centroid};

/// Which derived fields to attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub centers: bool,
    pub names: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            centers: true,
            names: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CenterReport {
    /// Centers taken from a positive-area outline
    pub from_polygon: usize,
    /// Every outline was degenerate
    pub fallback: usize,
    /// No paths at all, center set to the origin
    pub defaulted: usize,
    /// Coordinates too large for the computation, center set to the origin
    pub non_finite: usize,
}

impl CenterReport {
    pub fn total(&self) -> usize {
        self.from_polygon + self.fallback + self.defaulted + self.non_finite
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NamesReport {
    pub named: usize,
    /// Entities without a `class` to copy
    pub skipped: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub entities: usize,
    pub centers: Option<CenterReport>,
    pub names: Option<NamesReport>,
}

/// Attach a `center` to every entity, replacing any existing one
pub fn assign_centers(entities: &mut [Entity]) -> CenterReport {
    let mut report = CenterReport::default();

    for entity in entities.iter_mut() {
        if !entity.has_paths() {
            warn!(
                "No centroid for {}. No paths. Using (0,0).",
                entity.label()
            );
            report.defaulted += 1;
            entity.set_center(Point::ORIGIN);
            continue;
        }

        let estimate = best_centroid(&entity.point_sequences());
        if !estimate.center.is_finite() {
            warn!(
                "No centroid for {}. Coordinates overflow. Using (0,0).",
                entity.label()
            );
            report.non_finite += 1;
            entity.set_center(Point::ORIGIN);
            continue;
        }

        match estimate.source {
            CenterSource::Polygon { index, area } => {
                debug!(
                    "{}: center ({}, {}) from path {} (area {})",
                    entity.label(),
                    estimate.center.x,
                    estimate.center.y,
                    index,
                    area
                );
                report.from_polygon += 1;
            }
            CenterSource::Fallback | CenterSource::Default => {
                warn!("No centroid for {}. Adding fallback point.", entity.label());
                report.fallback += 1;
            }
        }

        entity.set_center(estimate.center);
    }

    report
}

/// Set `names` to a single-element list holding the entity's `class`
///
/// Any JSON value is copied as is; only a missing `class` is skipped.
pub fn assign_names(entities: &mut [Entity]) -> NamesReport {
    let mut report = NamesReport::default();

    for (i, entity) in entities.iter_mut().enumerate() {
        match entity.class().cloned() {
            Some(class) => {
                entity.set_names(vec![class]);
                report.named += 1;
            }
            None => {
                warn!("Entity {} has no class, leaving names unset", i);
                report.skipped += 1;
            }
        }
    }

    report
}

/// Apply the enabled transformations in place
pub fn run(entities: &mut [Entity], options: &Options) -> RunReport {
    let centers = options.centers.then(|| assign_centers(entities));
    let names = options.names.then(|| assign_names(entities));

    RunReport {
        entities: entities.len(),
        centers,
        names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use serde_json::Value;
    use std::sync::Mutex;

    struct CaptureLogger {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    fn install_logger() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    }

    /// Captured warnings mentioning `label`; tests run in parallel, so each
    /// one uses labels of its own
    fn warnings_for(label: &str) -> Vec<String> {
        LOGGER
            .lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, line)| *level == Level::Warn && line.contains(label))
            .map(|(_, line)| line.clone())
            .collect()
    }

    fn parse(json: &str) -> Entity {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_every_entity_gets_a_center() {
        let mut entities = vec![
            Entity::new("Square", &["M0 0 L2 0 L2 2 L0 2 Z"]),
            Entity::new("Line", &["M0 0 L4 0"]),
            Entity::new("Empty", &[]),
            Entity::default(),
        ];

        let report = assign_centers(&mut entities);

        assert!(entities.iter().all(|e| e.center().is_some()));
        assert_eq!(entities[0].center(), Some(Point::new(1.0, 1.0)));
        assert_eq!(entities[1].center(), Some(Point::new(2.0, 0.0)));
        assert_eq!(entities[2].center(), Some(Point::ORIGIN));
        assert_eq!(entities[3].center(), Some(Point::ORIGIN));
        assert_eq!(
            report,
            CenterReport {
                from_polygon: 1,
                fallback: 1,
                defaulted: 2,
                non_finite: 0,
            }
        );
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_fallback_and_default_are_logged() {
        install_logger();
        let mut entities = vec![
            Entity::new("Flatland", &["M0 0 L4 0"]),
            Entity::new("Nowhere", &[]),
            Entity::new("Squareland", &["M0 0 L2 0 L2 2 L0 2"]),
        ];

        assign_centers(&mut entities);

        assert_eq!(
            warnings_for("Flatland"),
            ["No centroid for Flatland. Adding fallback point."]
        );
        assert_eq!(
            warnings_for("Nowhere"),
            ["No centroid for Nowhere. No paths. Using (0,0)."]
        );
        assert!(warnings_for("Squareland").is_empty());
    }

    #[test]
    fn test_unnamed_entity_is_logged() {
        install_logger();
        let mut entities = vec![
            Entity::new("Tuvalu", &[]),
            parse(r#"{"id": "no-class-here"}"#),
        ];

        assign_names(&mut entities);
        assign_centers(&mut entities[1..]);

        assert_eq!(
            warnings_for("Entity 1 has no class"),
            ["Entity 1 has no class, leaving names unset"]
        );
        assert!(!warnings_for("No centroid for ???. No paths.").is_empty());
    }

    #[test]
    fn test_largest_outline_wins() {
        let mut entities = vec![Entity::new(
            "Archipelago",
            &["M0 0 L1 0 L1 1 L0 1 Z", "M10 10 L20 10 L20 20 L10 20 Z"],
        )];

        assign_centers(&mut entities);
        assert_eq!(entities[0].center(), Some(Point::new(15.0, 15.0)));
    }

    #[test]
    fn test_unparseable_path_falls_back() {
        let mut entities = vec![Entity::new("Broken", &["C1,2 3,4"])];

        let report = assign_centers(&mut entities);
        assert_eq!(report.fallback, 1);
        assert_eq!(entities[0].center(), Some(Point::ORIGIN));
    }

    #[test]
    fn test_overflowing_coordinates_default_to_origin() {
        let big = format!("1{}", "0".repeat(200));
        let d = format!("M0 0 L{b} 0 L{b} {b} L0 {b}", b = big);
        let mut entities = vec![Entity::new("Hugeland", &[d.as_str()])];

        let report = assign_centers(&mut entities);

        assert_eq!(report.non_finite, 1);
        assert_eq!(entities[0].center(), Some(Point::ORIGIN));
        let json = serde_json::to_string(&entities[0]).unwrap();
        assert!(json.contains(r#""center":{"x":0.0,"y":0.0}"#));
    }

    #[test]
    fn test_existing_center_is_replaced() {
        let mut entities = vec![parse(
            r#"{"center": "stale", "class": "Square", "paths": [{"d": "M0 0 L2 0 L2 2 L0 2"}]}"#,
        )];

        assign_centers(&mut entities);
        assert_eq!(entities[0].center(), Some(Point::new(1.0, 1.0)));
        assert_eq!(
            entities[0].fields().keys().next().map(String::as_str),
            Some("center")
        );
    }

    #[test]
    fn test_assign_names() {
        let mut entities = vec![
            Entity::new("Japan", &[]),
            Entity::default(),
            parse(r#"{"class": 42, "names": "stale"}"#),
        ];

        let report = assign_names(&mut entities);

        assert_eq!(entities[0].names(), Some(&Value::from(vec!["Japan"])));
        assert_eq!(entities[1].names(), None);
        assert_eq!(entities[2].names(), Some(&Value::from(vec![42])));
        assert_eq!(
            report,
            NamesReport {
                named: 2,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_run_respects_options() {
        let mut entities = vec![Entity::new("Mali", &["M0 0 L2 0 L2 2 L0 2"])];

        let report = run(
            &mut entities,
            &Options {
                centers: false,
                names: true,
            },
        );

        assert_eq!(report.entities, 1);
        assert!(report.centers.is_none());
        assert_eq!(report.names.map(|n| n.named), Some(1));
        assert!(entities[0].center().is_none());
        assert_eq!(entities[0].names(), Some(&Value::from(vec!["Mali"])));
    }

    #[test]
    fn test_order_independent() {
        let mut forward = vec![
            Entity::new("A", &["M0 0 L2 0 L2 2 L0 2"]),
            Entity::new("B", &["M5 5 L9 5 L9 8"]),
        ];
        let mut reversed: Vec<Entity> = forward.iter().rev().cloned().collect();

        assign_centers(&mut forward);
        assign_centers(&mut reversed);

        assert_eq!(forward[0].center(), reversed[1].center());
        assert_eq!(forward[1].center(), reversed[0].center());
    }
}
