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

//! Body masking.

use serde_json::{Map, Value};
use std::borrow::Cow;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Masks the given top-level fields of a JSON object.
///
/// The body is parsed as a JSON object, the values of all listed fields that
/// are present are replaced with `"*"`, and the object is serialized again,
/// which yields compact output with keys in sorted order. Nested objects are
/// left untouched. If the body isn't a valid JSON object, the failure is
/// logged and the body is returned unchanged.
///
/// # Examples
///
/// ```
/// use waypoint::middleware::log::mask;
///
/// // Mask field of JSON object
/// let body = mask(br#"{"name": "Jane", "age": 30}"#, &["name"]);
/// assert_eq!(&*body, br#"{"age":30,"name":"*"}"#);
///
/// // Invalid JSON is returned unchanged
/// let body = mask(b"name=Jane", &["name"]);
/// assert_eq!(&*body, b"name=Jane");
/// ```
#[must_use]
pub fn mask<'a, S>(data: &'a [u8], fields: &[S]) -> Cow<'a, [u8]>
where
    S: AsRef<str>,
{
    let mut object = match serde_json::from_slice::<Map<String, Value>>(data) {
        Ok(object) => object,
        Err(err) => {
            tracing::error!(%err, "failed to parse body for masking");
            return Cow::Borrowed(data);
        }
    };

    // Replace values of all fields present
    for field in fields {
        if let Some(value) = object.get_mut(field.as_ref()) {
            *value = Value::String(String::from("*"));
        }
    }

    // Serialize object, falling back to the body in the unlikely case of
    // a failure, which can only happen for maps with non-string keys
    match serde_json::to_vec(&object) {
        Ok(data) => Cow::Owned(data),
        Err(err) => {
            tracing::error!(%err, "failed to serialize masked body");
            Cow::Borrowed(data)
        }
    }
}
