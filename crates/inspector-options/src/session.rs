//! # Session Service Seam
//!
//! The panel asks the org's session service who is logged in. The service
//! itself lives outside this crate; the model only needs something that can
//! answer that one question asynchronously.

use std::future::Future;
use std::sync::Arc;

use inspector_core::UserInfo;

use crate::error::OptionsResult;

/// Remote session / describe-metadata service.
///
/// Failures are returned as [`OptionsError::Metadata`](crate::OptionsError::Metadata);
/// when the model runs the request through its tracker they are logged and
/// the placeholder user info stays in place.
pub trait MetadataSource: Send + Sync + 'static {
    /// Fetches the identity of the logged-in user.
    fn get_user_info(&self) -> impl Future<Output = OptionsResult<UserInfo>> + Send;
}

impl<S: MetadataSource> MetadataSource for Arc<S> {
    fn get_user_info(&self) -> impl Future<Output = OptionsResult<UserInfo>> + Send {
        (**self).get_user_info()
    }
}
