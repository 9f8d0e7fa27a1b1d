/// Development utilities module
///
/// Test doubles that stand in for the network so the browser can be
/// exercised offline.

pub mod mock_source;
