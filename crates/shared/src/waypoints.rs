use crate::models::Direction;

#[derive(Debug, Clone, PartialEq)]
struct Waypoint {
    id: String,
    /// Scroll position at which the anchor crosses its offset line.
    trigger_y: f64,
}

/// A section fires `Down` when its anchor's top edge scrolls up to `offset`
/// pixels below the top of the viewport, and `Up` when it scrolls back below.
#[derive(Debug, Clone, Default)]
pub struct Waypoints {
    points: Vec<Waypoint>,
    last_scroll: Option<f64>,
}

impl Waypoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace anchors with `(id, document top, offset)` triples.
    /// The last known scroll position is kept.
    pub fn set_anchors<'a>(&mut self, anchors: impl IntoIterator<Item = (&'a str, f64, f64)>) {
        self.points = anchors
            .into_iter()
            .map(|(id, top, offset)| Waypoint {
                id: id.to_string(),
                trigger_y: top - offset,
            })
            .collect();
        self.points
            .sort_by(|a, b| a.trigger_y.total_cmp(&b.trigger_y));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Transitions crossed since the previous call, in the order the reader
    /// passed them. On the first call every anchor the page is already
    /// scrolled past fires `Down`, top to bottom.
    pub fn update(&mut self, scroll_y: f64) -> Vec<(String, Direction)> {
        let Some(last) = self.last_scroll.replace(scroll_y) else {
            return self
                .points
                .iter()
                .filter(|w| w.trigger_y <= scroll_y)
                .map(|w| (w.id.clone(), Direction::Down))
                .collect();
        };

        if scroll_y > last {
            self.points
                .iter()
                .filter(|w| last < w.trigger_y && w.trigger_y <= scroll_y)
                .map(|w| (w.id.clone(), Direction::Down))
                .collect()
        } else if scroll_y < last {
            self.points
                .iter()
                .rev()
                .filter(|w| scroll_y < w.trigger_y && w.trigger_y <= last)
                .map(|w| (w.id.clone(), Direction::Up))
                .collect()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> Waypoints {
        let mut w = Waypoints::new();
        w.set_anchors([("two", 1500.0, 150.0), ("one", 800.0, 300.0), ("three", 2000.0, 150.0)]);
        w
    }

    #[test]
    fn test_first_update_fires_passed_anchors() {
        let mut w = tracker();
        assert_eq!(
            w.update(1400.0),
            vec![
                ("one".to_string(), Direction::Down),
                ("two".to_string(), Direction::Down)
            ]
        );
        assert!(w.update(1400.0).is_empty());
    }

    #[test]
    fn test_first_update_at_top_fires_nothing() {
        let mut w = tracker();
        assert!(w.update(0.0).is_empty());
        assert_eq!(w.update(500.0), vec![("one".to_string(), Direction::Down)]);
    }

    #[test]
    fn test_scroll_down_in_order() {
        let mut w = tracker();
        w.update(0.0);
        assert!(w.update(499.0).is_empty());
        assert_eq!(w.update(500.0), vec![("one".to_string(), Direction::Down)]);
        assert_eq!(
            w.update(3000.0),
            vec![
                ("two".to_string(), Direction::Down),
                ("three".to_string(), Direction::Down)
            ]
        );
    }

    #[test]
    fn test_scroll_up_reverse_order() {
        let mut w = tracker();
        w.update(3000.0);
        assert_eq!(
            w.update(0.0),
            vec![
                ("three".to_string(), Direction::Up),
                ("two".to_string(), Direction::Up),
                ("one".to_string(), Direction::Up)
            ]
        );
    }

    #[test]
    fn test_no_movement_no_events() {
        let mut w = tracker();
        w.update(1400.0);
        assert!(w.update(1400.0).is_empty());
    }
}
