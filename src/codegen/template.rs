//! Output Templates
//!
//! Fixed text of the generated C artifacts. Placeholders are written as
//! `${key}` and filled by [`Template::render`] in a single left-to-right pass;
//! substituted values are never re-scanned, so an endpoint that happens to
//! contain `${...}` is copied verbatim.

/// A fixed piece of output text with `${key}` placeholders
#[derive(Debug, Clone, Copy)]
pub struct Template(&'static str);

impl Template {
    /// Substitute `vars` into the template.
    ///
    /// Placeholders without a matching key are left untouched.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(self.0.len() * 2);
        let mut rest = self.0;

        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                output.push_str(&rest[start..]);
                return output;
            };
            let key = &after[..end];
            match vars.iter().find(|(k, _)| *k == key) {
                Some((_, value)) => output.push_str(value),
                None => output.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }

        output.push_str(rest);
        output
    }
}

/// Declarations artifact (`<base>.h`)
pub const HEADER: Template = Template(
    r#"/**
 * @file ${output_filename}.h
 * @brief Contains automatically generated interfaces.
 *
 * @warning Do not modify this file manually.
 *
 * @details The generated structures contain all information regarding each interface.
 * and are automatically generated from the json interfaces definitions.
 */

// NOLINTNEXTLINE This guard is clear enough.
#ifndef ${include_guard}
#define ${include_guard}

#include <astarte_device_sdk/interface.h>
#include <astarte_device_sdk/mapping.h>

// Interface names should resemble as closely as possible their respective .json file names.
// NOLINTBEGIN(readability-identifier-naming)
${interfaces_declarations}
// NOLINTEND(readability-identifier-naming)

#endif /* ${include_guard} */
"#,
);

/// Definitions artifact (`<base>.c`)
pub const SOURCE: Template = Template(
    r#"/**
 * @file ${output_filename}.c
 * @brief Contains automatically generated interfaces.
 *
 * @warning Do not modify this file manually.
 */

#include "${output_filename}.h"

// Interface names should resemble as closely as possible their respective .json file names.
// NOLINTBEGIN(readability-identifier-naming)
${interfaces_definitions}

// NOLINTEND(readability-identifier-naming)
"#,
);

/// One line of the declarations artifact
pub const INTERFACE_DECLARATION: Template =
    Template(r#"extern const astarte_interface_t ${symbol};"#);

/// Mapping array plus interface record
pub const INTERFACE_DEFINITION: Template = Template(
    r#"
static const astarte_mapping_t ${mappings_symbol}[${mappings_length}] = {
${mappings}
};

const astarte_interface_t ${symbol} = {
    .name = "${name}",
    .major_version = ${version_major},
    .minor_version = ${version_minor},
    .type = ${type},
    .ownership = ${ownership},
    .aggregation = ${aggregation},
    .mappings = ${mappings_symbol},
    .mappings_length = ${mappings_length}U,
};"#,
);

/// One element of a mapping array
pub const MAPPING_DEFINITION: Template = Template(
    r#"
    {
        .endpoint = "${endpoint}",
        .type = ${type},
        .reliability = ${reliability},
        .explicit_timestamp = ${explicit_timestamp},
        .allow_unset = ${allow_unset},
    },"#,
);
