//! Post-traversal finalization of component instances

use super::context::ExtractionState;
use super::{ExtractionResult, InstanceQuery, QueryKind};
use crate::box_model::{BoxNode, MapBox};
use tracing::warn;

/// Turn every instance into a `Component` query on its entry, in creation order
///
/// Conditional spreads ride along as the map's spread conditions; they are
/// never merged into the props.
pub(super) fn reconcile(state: ExtractionState) -> ExtractionResult {
    let ExtractionState {
        mut results,
        instances,
        ..
    } = state;

    for instance in instances {
        let Some(entry) = results.get_mut(&instance.name) else {
            warn!(
                "No result entry for component instance {} at line {}",
                instance.name, instance.node.line
            );
            continue;
        };

        let props = MapBox::new(instance.props, instance.node, Vec::new())
            .with_spread_conditions(instance.conditionals);
        entry.queries.push(InstanceQuery {
            kind: QueryKind::Component,
            name: instance.name,
            value: BoxNode::Map(props),
        });
    }

    ExtractionResult::from(results)
}
