// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Structured tracing support for ingestion, fetching and resolution.

pub(crate) mod spans;

// Span helpers are internal and not re-exported
