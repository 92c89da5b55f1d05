//! Pattern-based export and import extraction
//!
//! Extraction works on raw text with two compiled patterns and never builds a
//! syntax tree. It is best-effort: anything the patterns do not recognise is
//! skipped, so a false negative is possible but extraction never fails.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::symbol::{SymbolKind, SymbolRecord};

use super::alias::AliasTable;
use super::module_map::module_id;

lazy_static! {
    /// `export [abstract] <keyword> <Identifier>`
    static ref DECLARATION: Regex = Regex::new(
        r"export\s+((?:abstract\s+)?class|type|interface|function|let|var|const|enum)\s+([a-zA-Z]\w*)"
    )
    .expect("declaration pattern is valid");

    /// `import [{ names } from] "module"`, names optional
    static ref IMPORT: Regex = Regex::new(
        r#"\bimport\s+(?:\{?\s*(.+?)\s*\}?\s+from\s+)?['"]([^"']+)["']"#
    )
    .expect("import pattern is valid");

    static ref NAME_SEPARATOR: Regex = Regex::new(r"\s*,\s*").expect("separator pattern is valid");
}

/// A single extraction rule over file text
pub trait SymbolMatcher {
    /// Append every record this rule finds in `text` to `out`
    fn collect(&self, text: &str, out: &mut Vec<SymbolRecord>);

    fn matches(&self, text: &str) -> Vec<SymbolRecord> {
        let mut out = Vec::new();
        self.collect(text, &mut out);
        out
    }
}

/// Finds locally declared exports
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationMatcher;

impl SymbolMatcher for DeclarationMatcher {
    fn collect(&self, text: &str, out: &mut Vec<SymbolRecord>) {
        for caps in DECLARATION.captures_iter(text) {
            let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let Ok(kind) = keyword.as_str().parse::<SymbolKind>() {
                out.push(SymbolRecord::declaration(name.as_str(), kind));
            }
        }
    }
}

/// Finds names imported from external modules.
///
/// Relative modules (containing `./`) and loader-prefixed modules (containing
/// `!`) are skipped: they do not name an installable package.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportMatcher;

impl ImportMatcher {
    pub fn is_external(module: &str) -> bool {
        !module.contains("./") && !module.contains('!')
    }
}

impl SymbolMatcher for ImportMatcher {
    fn collect(&self, text: &str, out: &mut Vec<SymbolRecord>) {
        for caps in IMPORT.captures_iter(text) {
            let Some(module) = caps.get(2).map(|m| m.as_str()) else {
                continue;
            };
            if !Self::is_external(module) {
                continue;
            }
            // Side-effect imports carry no names
            let Some(names) = caps.get(1) else {
                continue;
            };

            out.extend(
                NAME_SEPARATOR
                    .split(names.as_str())
                    .filter(|name| !name.is_empty())
                    .map(|name| SymbolRecord::imported(name, module)),
            );
        }
    }
}

/// Result of running both passes over one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub declarations: Vec<SymbolRecord>,
    pub imports: Vec<SymbolRecord>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.declarations.len() + self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.imports.is_empty()
    }

    /// Declarations first, then imports
    pub fn records(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.declarations.iter().chain(self.imports.iter())
    }
}

/// Runs the declaration pass then the import pass
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolExtractor {
    declarations: DeclarationMatcher,
    imports: ImportMatcher,
}

impl SymbolExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract raw records from text. Declarations have no module or path yet.
    pub fn extract(&self, text: &str) -> Extraction {
        Extraction {
            declarations: self.declarations.matches(text),
            imports: self.imports.matches(text),
        }
    }

    /// Extract records for a file, attaching its path and module id to every
    /// declaration.
    pub fn extract_file(&self, file_path: &Path, text: &str, aliases: &AliasTable) -> Extraction {
        let module = module_id(file_path, aliases);
        let mut extraction = self.extract(text);

        for record in &mut extraction.declarations {
            record.module = module.clone();
            record.file_path = Some(file_path.to_path_buf());
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Extraction {
        SymbolExtractor::new().extract(text)
    }

    #[test]
    fn test_export_class() {
        let result = extract("export class Foo {}");
        assert_eq!(result.declarations, vec![SymbolRecord::declaration("Foo", SymbolKind::Class)]);
        assert!(result.imports.is_empty());
    }

    #[test]
    fn test_abstract_class_normalizes_to_class() {
        let result = extract("export abstract class Bar {}");
        assert_eq!(result.declarations.len(), 1);
        assert_eq!(result.declarations[0].name, "Bar");
        assert_eq!(result.declarations[0].kind, Some(SymbolKind::Class));
    }

    #[test]
    fn test_every_declaration_keyword() {
        let text = r#"
            export type Id = string;
            export interface Shape { area(): number }
            export function area(s: Shape) { return s.area(); }
            export let counter = 0;
            export var legacy = 1;
            export const PI = 3.14;
            export enum Color { Red }
        "#;

        let kinds: Vec<_> = extract(text)
            .declarations
            .into_iter()
            .map(|r| (r.name, r.kind.unwrap()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                ("Id".to_string(), SymbolKind::Type),
                ("Shape".to_string(), SymbolKind::Interface),
                ("area".to_string(), SymbolKind::Function),
                ("counter".to_string(), SymbolKind::Let),
                ("legacy".to_string(), SymbolKind::Var),
                ("PI".to_string(), SymbolKind::Const),
                ("Color".to_string(), SymbolKind::Enum),
            ]
        );
    }

    #[test]
    fn test_identifier_must_start_with_letter() {
        assert!(extract("export const _private = 1;").declarations.is_empty());
        assert!(extract("export const $el = 1;").declarations.is_empty());
        assert_eq!(extract("export const a_1 = 1;").declarations[0].name, "a_1");
    }

    #[test]
    fn test_non_matching_exports_are_skipped() {
        assert!(extract("export default class Foo {}").declarations.is_empty());
        assert!(extract("export { a, b };").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_named_imports() {
        let result = extract(r#"import { A, B } from "some-lib""#);
        assert_eq!(
            result.imports,
            vec![
                SymbolRecord::imported("A", "some-lib"),
                SymbolRecord::imported("B", "some-lib"),
            ]
        );
    }

    #[test]
    fn test_default_import_and_single_quotes() {
        let result = extract("import React from 'react';");
        assert_eq!(result.imports, vec![SymbolRecord::imported("React", "react")]);
    }

    #[test]
    fn test_relative_and_loader_imports_excluded() {
        assert!(extract(r#"import X from "./local""#).imports.is_empty());
        assert!(extract(r#"import X from "../up/local""#).imports.is_empty());
        assert!(extract(r#"import Y from "loader!asset""#).imports.is_empty());
    }

    #[test]
    fn test_side_effect_import_has_no_names() {
        assert!(extract(r#"import "reflect-metadata";"#).imports.is_empty());
    }

    #[test]
    fn test_multiple_imports_and_trailing_comma() {
        let text = "import { Injectable, } from '@angular/core';\nimport { map } from \"rxjs/operators\";";
        let names: Vec<_> = extract(text)
            .imports
            .into_iter()
            .map(|r| (r.name, r.module.unwrap()))
            .collect();

        assert_eq!(
            names,
            vec![
                ("Injectable".to_string(), "@angular/core".to_string()),
                ("map".to_string(), "rxjs/operators".to_string()),
            ]
        );
    }

    #[test]
    fn test_extract_file_fills_module_and_path() {
        let aliases = AliasTable::from_prefixes(["/proj/src/"]);
        let path = Path::new("/proj/src/shapes/circle.ts");
        let text = "import { Point } from 'geometry';\nexport class Circle {}";

        let result = SymbolExtractor::new().extract_file(path, text, &aliases);

        let circle = &result.declarations[0];
        assert_eq!(circle.module.as_deref(), Some("shapes/circle"));
        assert_eq!(circle.file_path.as_deref(), Some(path));

        let point = &result.imports[0];
        assert_eq!(point.module.as_deref(), Some("geometry"));
        assert!(point.file_path.is_none());
        assert!(point.kind.is_none());

        let order: Vec<_> = result.records().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["Circle", "Point"]);
    }
}
