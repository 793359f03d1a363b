//! Order status transition rules
//!
//! The role-gated state machine as pure data: who may move an order to which
//! status, and which field writes ride along with the move. No IO here; the
//! manager feeds in the current status it read and applies the result with a
//! compare-and-swap write.

use crate::db::models::{OrderStatus, Role};
use crate::utils::AppError;

/// Field effects that accompany a status transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionEffects {
    /// Flip the order's payment status to refunded
    pub refund: bool,
    /// Stamp `actual_delivery_time` with the write time
    pub mark_delivered: bool,
}

/// A transition denied by the rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Target status is outside the actor's capability set
    NotPermitted { role: Role, target: OrderStatus },
    /// Customer cancellation attempted after the cutoff statuses
    CancelNotAllowed { current: OrderStatus },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NotPermitted { role, target } => AppError::Forbidden(format!(
                "Role {} is not authorized to set status {}",
                role, target
            )),
            TransitionError::CancelNotAllowed { current } => AppError::Validation(format!(
                "Order cannot be cancelled in status {}",
                current
            )),
        }
    }
}

const OWNER_TARGETS: &[OrderStatus] = &[
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::ReadyForPickup,
    OrderStatus::Rejected,
];

const DELIVERY_TARGETS: &[OrderStatus] = &[OrderStatus::OutForDelivery, OrderStatus::Delivered];

const ADMIN_TARGETS: &[OrderStatus] = &[
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::ReadyForPickup,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Rejected,
];

/// Statuses a role may set through the status endpoint
///
/// Owners additionally get `cancelled` while the order is still pending;
/// that case depends on the current status and lives in
/// [`authorize_transition`]. Customers never use the status endpoint.
pub fn allowed_targets(role: Role) -> &'static [OrderStatus] {
    match role {
        Role::RestaurantOwner => OWNER_TARGETS,
        Role::DeliveryPersonnel => DELIVERY_TARGETS,
        Role::Admin => ADMIN_TARGETS,
        Role::Customer => &[],
    }
}

/// Authorize one status move and compute its side effects
///
/// Relation checks (owner owns the restaurant, deliverer is assigned) are
/// the manager's job; this function assumes they already passed.
pub fn authorize_transition(
    role: Role,
    current: OrderStatus,
    target: OrderStatus,
) -> Result<TransitionEffects, TransitionError> {
    let permitted = allowed_targets(role).contains(&target)
        || (role == Role::RestaurantOwner
            && target == OrderStatus::Cancelled
            && current == OrderStatus::Pending);

    if !permitted {
        return Err(TransitionError::NotPermitted { role, target });
    }

    // Admin moves are corrections and carry no automatic field effects
    if role == Role::Admin {
        return Ok(TransitionEffects::default());
    }

    Ok(TransitionEffects {
        refund: matches!(target, OrderStatus::Rejected | OrderStatus::Cancelled),
        mark_delivered: target == OrderStatus::Delivered,
    })
}

/// Authorize a customer cancelling their own order
///
/// Allowed while the order is pending or confirmed; later statuses fail as
/// validation errors because the request itself is no longer meaningful.
pub fn authorize_cancel(current: OrderStatus) -> Result<TransitionEffects, TransitionError> {
    match current {
        OrderStatus::Pending | OrderStatus::Confirmed => Ok(TransitionEffects {
            refund: true,
            mark_delivered: false,
        }),
        _ => Err(TransitionError::CancelNotAllowed { current }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_targets_cover_kitchen_flow() {
        for target in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::Rejected,
        ] {
            let effects =
                authorize_transition(Role::RestaurantOwner, OrderStatus::Pending, target)
                    .expect("owner move");
            assert_eq!(effects.refund, target == OrderStatus::Rejected);
            assert!(!effects.mark_delivered);
        }
    }

    #[test]
    fn owner_may_cancel_only_pending_orders() {
        let effects = authorize_transition(
            Role::RestaurantOwner,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
        )
        .expect("cancel pending");
        assert!(effects.refund);

        let denied = authorize_transition(
            Role::RestaurantOwner,
            OrderStatus::Preparing,
            OrderStatus::Cancelled,
        )
        .unwrap_err();
        assert!(matches!(denied, TransitionError::NotPermitted { .. }));
    }

    #[test]
    fn owner_cannot_play_courier() {
        for target in [OrderStatus::OutForDelivery, OrderStatus::Delivered] {
            assert!(
                authorize_transition(Role::RestaurantOwner, OrderStatus::ReadyForPickup, target)
                    .is_err()
            );
        }
    }

    #[test]
    fn delivery_moves_and_effects() {
        let effects = authorize_transition(
            Role::DeliveryPersonnel,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
        )
        .unwrap();
        assert_eq!(effects, TransitionEffects::default());

        let effects = authorize_transition(
            Role::DeliveryPersonnel,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        )
        .unwrap();
        assert!(effects.mark_delivered);
        assert!(!effects.refund);
    }

    #[test]
    fn delivery_cannot_touch_kitchen_statuses() {
        for target in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::Rejected,
            OrderStatus::Cancelled,
        ] {
            assert!(
                authorize_transition(Role::DeliveryPersonnel, OrderStatus::Pending, target)
                    .is_err()
            );
        }
    }

    #[test]
    fn customer_has_no_status_endpoint_targets() {
        assert!(allowed_targets(Role::Customer).is_empty());
        assert!(
            authorize_transition(Role::Customer, OrderStatus::Pending, OrderStatus::Cancelled)
                .is_err()
        );
    }

    #[test]
    fn admin_may_set_anything_without_effects() {
        for target in ADMIN_TARGETS {
            let effects =
                authorize_transition(Role::Admin, OrderStatus::Delivered, *target).unwrap();
            assert_eq!(effects, TransitionEffects::default());
        }
    }

    #[test]
    fn customer_cancel_window() {
        assert!(authorize_cancel(OrderStatus::Pending).unwrap().refund);
        assert!(authorize_cancel(OrderStatus::Confirmed).unwrap().refund);

        for current in [
            OrderStatus::Preparing,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Rejected,
        ] {
            let denied = authorize_cancel(current).unwrap_err();
            assert!(matches!(denied, TransitionError::CancelNotAllowed { .. }));
        }
    }
}
