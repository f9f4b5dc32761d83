// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Validation gates.

use crate::http::Request;

use super::normalize::is_normalized;
use super::printable::is_printable_ascii;
use super::rejection::{Field, Rejection};
use super::Firewall;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Gates in order of evaluation, where the first failing gate wins.
pub(super) const GATES: [Gate; 5] = [
    method, // fmt
    blocklist,
    hostname,
    normalization,
    printable,
];

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Checks that the method is allowed.
fn method(firewall: &Firewall, req: &Request) -> Result<(), Rejection> {
    if firewall.methods.allows(&req.method) {
        Ok(())
    } else {
        let method = req.method.to_string();
        Err(Rejection::MethodNotAllowed { method })
    }
}

/// Checks that no field contains a blocklisted literal.
///
/// The encoded set is checked against every field that represents the request
/// target as received, and the decoded set against the path only.
fn blocklist(firewall: &Firewall, req: &Request) -> Result<(), Rejection> {
    let fields = [
        (Field::RawUrl, Some(req.uri.raw.as_ref())),
        (Field::Path, Some(req.uri.path.as_ref())),
        (Field::OriginalUrl, Some(req.original_url())),
        (Field::Route, req.route.as_deref()),
        (Field::BasePath, req.base.as_deref()),
    ];
    for (field, value) in present(&fields) {
        if let Some(literal) = firewall.blocklist.find_encoded(value) {
            let literal = literal.to_string();
            return Err(Rejection::Blocklisted { field, literal });
        }
    }

    // Check decoded path
    match firewall.blocklist.find_decoded(&req.uri.path) {
        Some(literal) => Err(Rejection::Blocklisted {
            field: Field::Path,
            literal: literal.to_string(),
        }),
        None => Ok(()),
    }
}

/// Checks that the hostname is trusted, if any.
fn hostname(firewall: &Firewall, req: &Request) -> Result<(), Rejection> {
    let Some(hostname) = req.hostname() else {
        return Ok(());
    };

    // Evaluate predicate, treating a fault as a rejection
    match firewall.options.allowed_hostnames.evaluate(hostname) {
        Ok(true) => Ok(()),
        Ok(false) => Err(Rejection::UntrustedHost {
            hostname: hostname.to_string(),
        }),
        Err(fault) => Err(Rejection::PredicateFault {
            field: Field::Hostname,
            fault,
        }),
    }
}

/// Checks that no field contains `.` or `..` segments.
fn normalization(_: &Firewall, req: &Request) -> Result<(), Rejection> {
    let fields = [
        (Field::RawUrl, Some(req.uri.raw.as_ref())),
        (Field::OriginalUrl, Some(req.original_url())),
        (Field::Path, Some(req.uri.path.as_ref())),
        (Field::Route, req.route.as_deref()),
    ];
    for (field, value) in present(&fields) {
        if !is_normalized(value) {
            let value = value.to_string();
            return Err(Rejection::NonNormalizedPath { field, value });
        }
    }
    Ok(())
}

/// Checks that the raw request target only consists of printable ASCII.
fn printable(_: &Firewall, req: &Request) -> Result<(), Rejection> {
    if is_printable_ascii(&req.uri.raw) {
        Ok(())
    } else {
        Err(Rejection::NonPrintable {
            field: Field::RawUrl,
            value: req.uri.raw.to_string(),
        })
    }
}

/// Returns the fields that are present.
fn present<'a>(
    fields: &[(Field, Option<&'a str>)],
) -> impl Iterator<Item = (Field, &'a str)> {
    fields
        .iter()
        .filter_map(|&(field, value)| value.map(|value| (field, value)))
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Gate, which admits or rejects a request.
pub(super) type Gate = fn(&Firewall, &Request) -> Result<(), Rejection>;
