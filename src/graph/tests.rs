#[cfg(test)]
mod tests {
    use crate::graph::{
        Connection, RoadElement, RoadEnd, RoadGraph, RoadId, RoadJunction, RoadPoint, RoadType,
    };
    use approx::assert_abs_diff_eq;

    fn corner_graph() -> RoadGraph {
        let mut a = RoadElement::new(1, RoadType::Car, 3.0, 2, vec![(0.0, 0.0), (10.0, 0.0)]);
        let mut b = RoadElement::new(2, RoadType::Car, 3.0, 2, vec![(10.0, 0.0), (10.0, 10.0)]);
        a.end = Some(0);
        b.start = Some(0);
        let mut junction = RoadJunction::new(RoadPoint::new(10.0, 0.0), RoadType::Car);
        junction.connections.push(Connection::new(0, RoadEnd::End));
        junction.connections.push(Connection::new(1, RoadEnd::Start));
        RoadGraph::new(vec![a, b], vec![junction])
    }

    #[test]
    fn test_road_type_parsing() {
        assert_eq!("car".parse::<RoadType>().unwrap(), RoadType::Car);
        assert_eq!("Bike".parse::<RoadType>().unwrap(), RoadType::Bike);
        assert_eq!(RoadType::Pedestrian.to_string(), "pedestrian");
        assert!("tram".parse::<RoadType>().is_err());
    }

    #[test]
    fn test_graph_accessors() {
        let graph = corner_graph();
        assert_eq!(graph.elements().len(), 2);
        assert_eq!(graph.junction(0).unwrap().connections.len(), 2);
        assert!(graph.element(5).is_err());
        assert!(graph.junction(1).is_err());
        assert_eq!(graph.find_element(RoadId::Source(2)), Some(1));
        assert_eq!(graph.junctions_of(0), vec![0]);
        assert!(graph.junctions_of(9).is_empty());
        assert!(!graph.is_resolved());
    }

    #[test]
    fn test_element_helpers() {
        let el = RoadElement::new(7, RoadType::Bike, 1.0, 1, vec![(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert_abs_diff_eq!(el.length(), 11.0);
        assert_eq!(el.endpoint(RoadEnd::End), Some(RoadPoint::new(3.0, 10.0)));
        assert_eq!(el.to_line_string().0.len(), 3);
        assert_eq!(el.id.to_string(), "7");
        assert_eq!(RoadId::Synthetic(3).to_string(), "synthetic-3");
    }

    #[test]
    fn test_junction_polygon_closes_ring() {
        let mut junction = RoadJunction::new(RoadPoint::new(0.0, 0.0), RoadType::Car);
        assert!(junction.to_polygon().is_none());
        junction.polygon = vec![
            RoadPoint::new(-1.0, -1.0),
            RoadPoint::new(-1.0, 1.0),
            RoadPoint::new(1.0, 1.0),
            RoadPoint::new(1.0, -1.0),
        ];
        let poly = junction.to_polygon().unwrap();
        assert_eq!(poly.exterior().0.len(), 5);
        assert!(poly.exterior().is_closed());
    }

    #[test]
    fn test_junction_elements_dedup_loops() {
        let mut junction = RoadJunction::new(RoadPoint::new(0.0, 0.0), RoadType::Car);
        junction.connections.push(Connection::new(3, RoadEnd::Start));
        junction.connections.push(Connection::new(3, RoadEnd::End));
        junction.connections.push(Connection::new(1, RoadEnd::End));
        assert_eq!(junction.elements(), vec![1, 3]);
        assert!(junction.connections[0].is_reversed());
    }
}
