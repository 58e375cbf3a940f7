//! # Department Routing
//!
//! Static service-delivery network from intake to close-out. Built once per
//! [`DepartmentNetwork`] and read-only afterwards.

use crate::collections::DynamicArray;
use crate::graph::{EdgeKind, Graph};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage in the service-delivery network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    CallCentre,
    Triage,
    Water,
    Electricity,
    Roads,
    Sanitation,
    Waste,
    PublicSafety,
    Finance,
    FieldOps,
    QualityAssurance,
    CloseOut,
}

impl Department {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Department::CallCentre => "Call Centre",
            Department::Triage => "Triage",
            Department::Water => "Water",
            Department::Electricity => "Electricity",
            Department::Roads => "Roads",
            Department::Sanitation => "Sanitation",
            Department::Waste => "Waste",
            Department::PublicSafety => "Public Safety",
            Department::Finance => "Finance",
            Department::FieldOps => "Field Ops",
            Department::QualityAssurance => "Quality Assurance",
            Department::CloseOut => "Close-Out",
        }
    }

    /// Department responsible for a category.
    ///
    /// Utilities has no dedicated department and goes straight to field
    /// operations.
    #[must_use]
    pub const fn for_category(category: Category) -> Department {
        match category {
            Category::Water => Department::Water,
            Category::Electricity => Department::Electricity,
            Category::Roads => Department::Roads,
            Category::Sanitation => Department::Sanitation,
            Category::Waste => Department::Waste,
            Category::Safety => Department::PublicSafety,
            Category::Utilities => Department::FieldOps,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edges of the network, in insertion order.
///
/// BFS expands neighbours in this order, so it decides which of several
/// equal-length routes is returned.
pub const ROUTING_EDGES: [(Department, Department); 16] = [
    (Department::CallCentre, Department::Triage),
    (Department::Triage, Department::Water),
    (Department::Triage, Department::Electricity),
    (Department::Triage, Department::Roads),
    (Department::Triage, Department::Sanitation),
    (Department::Triage, Department::Waste),
    (Department::Triage, Department::PublicSafety),
    (Department::Water, Department::FieldOps),
    (Department::Electricity, Department::FieldOps),
    (Department::Roads, Department::FieldOps),
    (Department::Sanitation, Department::FieldOps),
    (Department::Waste, Department::FieldOps),
    (Department::PublicSafety, Department::FieldOps),
    (Department::FieldOps, Department::QualityAssurance),
    (Department::QualityAssurance, Department::CloseOut),
    (Department::CloseOut, Department::Finance),
];

/// Unit-weight undirected routing graph.
#[derive(Debug, Clone)]
pub struct DepartmentNetwork {
    graph: Graph<Department>,
}

impl DepartmentNetwork {
    /// Weight of every routing edge.
    pub const UNIT_WEIGHT: f64 = 1.0;

    #[must_use]
    pub fn new() -> Self {
        let mut graph = Graph::new();
        for (from, to) in ROUTING_EDGES {
            if let Err(e) = graph.add_edge(from, to, Self::UNIT_WEIGHT, EdgeKind::Undirected) {
                tracing::error!(%from, %to, "routing edge refused: {}", e);
            }
        }
        tracing::debug!(
            departments = graph.vertex_count(),
            edges = graph.edge_count(),
            "department network built"
        );
        Self { graph }
    }

    #[must_use]
    pub fn graph(&self) -> &Graph<Department> {
        &self.graph
    }

    /// Intake path: Call Centre to the category's department.
    #[must_use]
    pub fn route_to_department(&self, category: Category) -> DynamicArray<Department> {
        self.graph
            .bfs_path(&Department::CallCentre, &Department::for_category(category))
    }

    /// Intake path followed by the department's path to Close-Out, with the
    /// department itself listed once.
    #[must_use]
    pub fn full_lifecycle_route(&self, category: Category) -> DynamicArray<Department> {
        let department = Department::for_category(category);
        let mut route = self.graph.bfs_path(&Department::CallCentre, &department);
        let to_close = self.graph.bfs_path(&department, &Department::CloseOut);
        route.extend(to_close.into_iter().skip(1));
        route
    }
}

impl Default for DepartmentNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Department::*;

    #[test]
    fn every_category_is_routed() {
        let network = DepartmentNetwork::new();
        for category in Category::ALL {
            let route = network.route_to_department(category);
            assert_eq!(route.first(), Some(&CallCentre));
            assert_eq!(route.last(), Some(&Department::for_category(category)));
        }
    }

    #[test]
    fn water_intake_and_lifecycle() {
        let network = DepartmentNetwork::new();
        assert_eq!(
            network.route_to_department(Category::Water).to_vec(),
            vec![CallCentre, Triage, Water]
        );
        assert_eq!(
            network.full_lifecycle_route(Category::Water).to_vec(),
            vec![CallCentre, Triage, Water, FieldOps, QualityAssurance, CloseOut]
        );
    }

    #[test]
    fn utilities_takes_first_inserted_branch_to_field_ops() {
        let network = DepartmentNetwork::new();
        assert_eq!(
            network.route_to_department(Category::Utilities).to_vec(),
            vec![CallCentre, Triage, Water, FieldOps]
        );
        assert_eq!(
            network.full_lifecycle_route(Category::Utilities).to_vec(),
            vec![CallCentre, Triage, Water, FieldOps, QualityAssurance, CloseOut]
        );
    }

    #[test]
    fn finance_hangs_off_close_out() {
        let network = DepartmentNetwork::new();
        assert_eq!(network.graph().vertex_count(), 12);
        assert_eq!(
            network.graph().bfs_path(&QualityAssurance, &Finance).to_vec(),
            vec![QualityAssurance, CloseOut, Finance]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(PublicSafety.to_string(), "Public Safety");
        assert_eq!(CloseOut.to_string(), "Close-Out");
    }
}
