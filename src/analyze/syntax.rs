//! Syntax-tree fold that extracts a module's imports and exports.

use tree_sitter::{Language, LanguageError, Node, Parser};

/// Grammar to parse a file with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain TypeScript (`.ts`), where `<T>x` is a type assertion.
    TypeScript,
    /// TypeScript or JavaScript with embedded markup (`.tsx`, `.jsx`, `.js`).
    Tsx,
}

impl SourceKind {
    /// Grammar for a project-relative path, chosen by extension.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("ts") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }
}

/// Module edges declared by one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleEdges {
    /// Module specifiers, in source order.
    pub dependencies: Vec<String>,
    /// Exported names, in source order.
    pub exports: Vec<String>,
}

/// A pair of tree-sitter parsers, one per grammar.
///
/// Parsers are not shareable across threads; give each worker its own.
pub struct SyntaxParser {
    typescript: Parser,
    tsx: Parser,
}

impl SyntaxParser {
    /// Creates parsers for both grammars.
    ///
    /// # Errors
    ///
    /// Returns an error if a grammar is incompatible with the linked
    /// tree-sitter runtime.
    pub fn new() -> Result<Self, LanguageError> {
        Ok(Self {
            typescript: parser_for(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?,
            tsx: parser_for(&tree_sitter_typescript::LANGUAGE_TSX.into())?,
        })
    }

    /// Parses `text` and folds its top-level statements into [`ModuleEdges`].
    ///
    /// `reexports` controls whether `export ... from "x"` contributes `x` to
    /// the dependencies.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic naming the first syntax error when the text does
    /// not parse cleanly.
    pub fn module_edges(
        &mut self,
        text: &str,
        kind: SourceKind,
        reexports: bool,
    ) -> Result<ModuleEdges, String> {
        let parser = match kind {
            SourceKind::TypeScript => &mut self.typescript,
            SourceKind::Tsx => &mut self.tsx,
        };
        let tree = parser.parse(text, None).ok_or_else(|| "parser gave up".to_string())?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(describe_error(root));
        }

        let src = text.as_bytes();
        let mut cursor = root.walk();
        let edges = root
            .named_children(&mut cursor)
            .fold(ModuleEdges::default(), |edges, stmt| {
                fold_statement(edges, stmt, src, reexports)
            });
        Ok(edges)
    }
}

fn parser_for(language: &Language) -> Result<Parser, LanguageError> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    Ok(parser)
}

fn fold_statement(
    mut edges: ModuleEdges,
    stmt: Node<'_>,
    src: &[u8],
    reexports: bool,
) -> ModuleEdges {
    match stmt.kind() {
        "import_statement" => {
            if let Some(spec) = source_specifier(stmt, src) {
                edges.dependencies.push(spec);
            }
        }
        "export_statement" => {
            if reexports {
                if let Some(spec) = source_specifier(stmt, src) {
                    edges.dependencies.push(spec);
                }
            }
            if has_default_keyword(stmt) {
                edges.exports.push("default".to_string());
            } else if let Some(decl) = stmt.child_by_field_name("declaration") {
                edges.exports.extend(declared_names(decl, src));
            }
        }
        _ => {}
    }
    edges
}

/// The unquoted `source` string of an import or re-export.
fn source_specifier(stmt: Node<'_>, src: &[u8]) -> Option<String> {
    let source = stmt.child_by_field_name("source")?;
    let raw = source.utf8_text(src).ok()?;
    Some(raw.trim_matches(|c| c == '"' || c == '\'').to_string())
}

fn has_default_keyword(stmt: Node<'_>) -> bool {
    let mut cursor = stmt.walk();
    let found = stmt.children(&mut cursor).any(|child| child.kind() == "default");
    found
}

/// Names bound by an exported function, class, or variable declaration.
fn declared_names(decl: Node<'_>, src: &[u8]) -> Vec<String> {
    let text = |node: Node<'_>| node.utf8_text(src).ok().map(str::to_string);
    match decl.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "abstract_class_declaration" => {
            decl.child_by_field_name("name").and_then(text).into_iter().collect()
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = decl.walk();
            let names = decl
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "variable_declarator")
                .filter_map(|declarator| declarator.child_by_field_name("name"))
                .filter(|name| name.kind() == "identifier")
                .filter_map(text)
                .collect();
            names
        }
        _ => Vec::new(),
    }
}

/// Locates the first error or missing node for a readable diagnostic.
fn describe_error(root: Node<'_>) -> String {
    let mut node = root;
    while !(node.is_error() || node.is_missing()) {
        let next = {
            let mut cursor = node.walk();
            let found = node.children(&mut cursor).find(|child| child.has_error());
            found
        };
        match next {
            Some(child) => node = child,
            None => break,
        }
    }
    let pos = node.start_position();
    let what = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        "syntax error".to_string()
    };
    format!("{what} at line {}, column {}", pos.row + 1, pos.column + 1)
}
