//! Shared fixtures for controller unit tests.

use std::sync::Arc;

use crate::domain::ports::MockUserRepository;
use crate::domain::{Authorizer, Envelope, Error, ErrorKind, Role, User, UserId};

/// Id of the acting user in controller tests.
pub const ACTOR: UserId = UserId::new(1);

/// Authorizer whose acting user has `role`, or is unknown for `None`.
pub fn authorizer_for(role: Option<Role>) -> Authorizer {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(move |id| {
        Ok(role.map(|role| User {
            id,
            name: "actor".to_owned(),
            role,
        }))
    });
    Authorizer::new(Arc::new(users))
}

/// Unwrap the failure side of an envelope.
pub fn expect_err<T: std::fmt::Debug>(envelope: Envelope<T>) -> Error {
    envelope.into_result().expect_err("envelope should carry an error")
}

/// Assert the envelope failed with `kind`.
pub fn assert_kind<T: std::fmt::Debug>(envelope: Envelope<T>, kind: ErrorKind) {
    assert_eq!(expect_err(envelope).kind(), kind);
}
