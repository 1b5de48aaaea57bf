use super::record::MeasurementKind;
use crate::geo::GeoPoint;

/// Points picked for the shape being drawn.
///
/// The last element is the floating vertex that follows the pointer. It is
/// never a confirmed vertex until a pick promotes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveShape {
    kind: MeasurementKind,
    points: Vec<GeoPoint>,
}

impl ActiveShape {
    /// First confirmed vertex plus a floating copy of it.
    pub fn start(kind: MeasurementKind, first: GeoPoint) -> Self {
        Self {
            kind,
            points: vec![first, first],
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    /// Every point including the floating vertex, in drawing order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn confirmed(&self) -> &[GeoPoint] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    pub fn confirmed_len(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn floating(&self) -> Option<&GeoPoint> {
        self.points.last()
    }

    /// Promote the floating vertex to `point` and push a new floating vertex.
    pub fn confirm(&mut self, point: GeoPoint) {
        if let Some(floating) = self.points.last_mut() {
            *floating = point;
        }
        self.points.push(point);
    }

    /// Move the floating vertex.
    pub fn track(&mut self, point: GeoPoint) {
        if let Some(floating) = self.points.last_mut() {
            *floating = point;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_duplicates_first_vertex_as_floating() {
        let shape = ActiveShape::start(MeasurementKind::Distance, GeoPoint::new(1.0, 2.0));
        assert_eq!(shape.points().len(), 2);
        assert_eq!(shape.confirmed(), &[GeoPoint::new(1.0, 2.0)]);
        assert_eq!(shape.floating(), Some(&GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn tracking_only_moves_the_last_point() {
        let mut shape = ActiveShape::start(MeasurementKind::Distance, GeoPoint::new(0.0, 0.0));
        shape.track(GeoPoint::new(5.0, 5.0));
        shape.track(GeoPoint::new(6.0, 6.0));

        assert_eq!(shape.confirmed(), &[GeoPoint::new(0.0, 0.0)]);
        assert_eq!(shape.floating(), Some(&GeoPoint::new(6.0, 6.0)));
    }

    #[test]
    fn confirm_promotes_at_the_picked_position() {
        let mut shape = ActiveShape::start(MeasurementKind::Area, GeoPoint::new(0.0, 0.0));
        shape.track(GeoPoint::new(0.9, 0.9));
        shape.confirm(GeoPoint::new(1.0, 1.0));

        assert_eq!(
            shape.confirmed(),
            &[GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]
        );
        assert_eq!(shape.floating(), Some(&GeoPoint::new(1.0, 1.0)));
    }
}
