// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Blind Injection Oracle Library
 * Decides TRUE/FALSE for blind-injection probes from response signals
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod config;

// Oracle decision core
pub mod inference;

// Collaborators: transport, templating and signal extraction
pub mod http_client;
pub mod signals;
pub mod template;

// Error handling
pub mod errors;

pub use errors::{OracleError, OracleResult, TransportError};
pub use inference::{Requester, RequesterState};
