//! Arena-based translation unit model.
//!
//! The unit owns flat tables of files, types, functions, and local
//! declarations; everything is addressed through stable ids (`FileId`,
//! `TypeId`, `FuncId`, `LocalId`). Function bodies reference locals by id
//! rather than by pointer, so the single mutation the analysis performs
//! (flipping a function's constexpr flag) goes through
//! [`TranslationUnit::function_mut`] and never needs aliasable references
//! into the tree.
//!
//! The whole model derives serde, so a front end can hand the analyzer a
//! JSON-serialized unit (see [`load_translation_unit`]).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConstexprifyError, ConstexprifyResult};

/// Index into [`TranslationUnit::files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

/// Index into [`TranslationUnit::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Index into [`TranslationUnit::functions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuncId(pub u32);

/// Index into [`TranslationUnit::locals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(pub u32);

/// A position in a source file.
///
/// `offset` is the byte offset used by fix-it application; `line` and
/// `column` are 1-indexed and used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLoc {
    pub file: FileId,
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(file: FileId, offset: u32, line: u32, column: u32) -> Self {
        Self { file, offset, line, column }
    }
}

/// A half-open source range, begin inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub begin: SourceLoc,
    pub end: SourceLoc,
}

impl SourceRange {
    pub fn new(begin: SourceLoc, end: SourceLoc) -> Self {
        Self { begin, end }
    }

    /// Degenerate range covering a single location.
    pub fn at(loc: SourceLoc) -> Self {
        Self { begin: loc, end: loc }
    }
}

/// A file referenced by the unit. Only the primary file is ever diagnosed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
}

/// Language rule set the advisory wording and body strictness follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "c++11")]
    Cxx11,
    #[default]
    #[serde(rename = "c++14")]
    Cxx14,
}

/// Resolved facts about a type, as a front end would record them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    /// Eligible for constant-expression evaluation.
    pub is_literal: bool,
    /// Depends on a template parameter; literalness is deferred.
    #[serde(default)]
    pub is_dependent: bool,
    /// Runtime-sized array type or similar.
    #[serde(default)]
    pub is_variably_modified: bool,
}

impl TypeInfo {
    /// A plain literal type (the common case for builtins).
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_literal: true,
            is_dependent: false,
            is_variably_modified: false,
        }
    }

    /// A non-literal type (e.g. one with a non-trivial destructor).
    pub fn non_literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_literal: false,
            is_dependent: false,
            is_variably_modified: false,
        }
    }

    /// A template-parameter-dependent type.
    pub fn dependent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_literal: false,
            is_dependent: true,
            is_variably_modified: false,
        }
    }
}

/// Storage duration of a local variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDuration {
    #[default]
    Automatic,
    Static,
    Thread,
}

/// Facts about a variable initializer, as resolved by the front end.
///
/// The analysis never evaluates expressions itself; it only consults these
/// pre-resolved facts through the [`Semantics`](crate::semantics::Semantics)
/// seam.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Initializer {
    /// Value depends on a template parameter.
    #[serde(default)]
    pub is_value_dependent: bool,
    /// Passes the integral-constant-expression pre-check.
    #[serde(default)]
    pub is_ice_candidate: bool,
    /// Classified as a valid constant initializer.
    #[serde(default)]
    pub is_constant_initializer: bool,
    /// Constant-evaluated value, when evaluation succeeds.
    #[serde(default)]
    pub evaluated: Option<i64>,
}

impl Initializer {
    /// An initializer that is a fully-resolved integral constant expression.
    pub fn constant(value: i64) -> Self {
        Self {
            is_value_dependent: false,
            is_ice_candidate: true,
            is_constant_initializer: true,
            evaluated: Some(value),
        }
    }

    /// An initializer with a runtime-only value.
    pub fn runtime() -> Self {
        Self::default()
    }
}

/// A local variable or decomposition declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub storage: StorageDuration,
    #[serde(default)]
    pub init: Option<Initializer>,
    /// Whether this declaration is a definition.
    #[serde(default = "default_true")]
    pub is_definition: bool,
    /// Introduced by a range-based for loop (no explicit initializer needed).
    #[serde(default)]
    pub is_for_range: bool,
    #[serde(default)]
    pub is_constexpr: bool,
    /// Structured binding rather than a plain variable.
    #[serde(default)]
    pub is_decomposition: bool,
}

fn default_true() -> bool {
    true
}

impl VarDecl {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            storage: StorageDuration::Automatic,
            init: None,
            is_definition: true,
            is_for_range: false,
            is_constexpr: false,
            is_decomposition: false,
        }
    }

    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_storage(mut self, storage: StorageDuration) -> Self {
        self.storage = storage;
        self
    }
}

/// Closed classification of declarations that appear inside a function body.
///
/// The body legality policy is a case analysis over exactly these kinds, so
/// the match in `check::body` is exhaustive by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalDeclKind {
    StaticAssert,
    UsingDeclaration,
    UsingDirective,
    UnresolvedUsing,
    TypeAlias {
        underlying: TypeId,
        /// Location of the aliased type, where a variably-modified-type
        /// failure is reported.
        type_loc: SourceLoc,
    },
    /// An enum or class type declared inline in the body.
    TagType {
        name: String,
        is_definition: bool,
    },
    EnumConstant,
    IndirectField,
    Parameter,
    Var(VarDecl),
    NamespaceAlias,
    /// A nested function declaration.
    Function,
    /// Anything the classification above does not cover.
    Other,
}

/// A declaration introduced inside a function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDecl {
    pub loc: SourceLoc,
    #[serde(flatten)]
    pub kind: LocalDeclKind,
}

impl LocalDecl {
    pub fn new(loc: SourceLoc, kind: LocalDeclKind) -> Self {
        Self { loc, kind }
    }
}

/// Statement kinds, as coarse as the analysis needs them.
///
/// Only declaration statements are inspected individually; the remaining
/// kinds exist so body-rule checks can tell permitted statements from ones
/// that disqualify a constexpr body (goto, try, asm).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum StmtKind {
    Decl { decls: Vec<LocalId> },
    Expr,
    Return,
    If,
    Loop,
    Switch,
    Compound,
    Null,
    Goto,
    Try,
    Asm,
}

/// A statement in a function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stmt {
    pub loc: SourceLoc,
    #[serde(flatten)]
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(loc: SourceLoc, kind: StmtKind) -> Self {
        Self { loc, kind }
    }
}

/// An ordered function body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    pub stmts: Vec<Stmt>,
}

/// A function parameter with its resolved type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeId,
    pub loc: SourceLoc,
    pub range: SourceRange,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeId, loc: SourceLoc) -> Self {
        Self {
            name: name.into(),
            ty,
            loc,
            range: SourceRange::at(loc),
        }
    }
}

/// A function (or constructor) declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    /// Start of the declaration; warnings anchor here and the fix-it inserts
    /// immediately before it.
    pub loc: SourceLoc,
    pub return_type: TypeId,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub is_constexpr: bool,
    /// The program entry point is never diagnosed or upgraded.
    #[serde(default)]
    pub is_entry_point: bool,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub is_virtual: bool,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, loc: SourceLoc, return_type: TypeId) -> Self {
        Self {
            name: name.into(),
            loc,
            return_type,
            params: Vec::new(),
            body: None,
            is_constexpr: false,
            is_entry_point: false,
            is_constructor: false,
            is_virtual: false,
        }
    }

    /// "function" or "constructor", for diagnostic wording.
    pub fn entity(&self) -> &'static str {
        if self.is_constructor {
            "constructor"
        } else {
            "function"
        }
    }
}

/// The root of the model: one parsed, semantically-resolved unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub files: Vec<SourceFile>,
    /// The file under direct analysis. Declarations located elsewhere
    /// (headers) are never mutated or diagnosed.
    pub primary_file: FileId,
    #[serde(default)]
    pub standard: Standard,
    pub types: Vec<TypeInfo>,
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub locals: Vec<LocalDecl>,
}

impl TranslationUnit {
    /// A unit whose primary file is `path`, with empty tables.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            files: vec![SourceFile { path: path.into() }],
            primary_file: FileId(0),
            standard: Standard::default(),
            types: Vec::new(),
            functions: Vec::new(),
            locals: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<String>) -> FileId {
        self.files.push(SourceFile { path: path.into() });
        FileId(self.files.len() as u32 - 1)
    }

    pub fn add_type(&mut self, info: TypeInfo) -> TypeId {
        self.types.push(info);
        TypeId(self.types.len() as u32 - 1)
    }

    pub fn add_function(&mut self, func: FunctionDecl) -> FuncId {
        self.functions.push(func);
        FuncId(self.functions.len() as u32 - 1)
    }

    pub fn add_local(&mut self, decl: LocalDecl) -> LocalId {
        self.locals.push(decl);
        LocalId(self.locals.len() as u32 - 1)
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn type_info(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.0 as usize]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.types[id.0 as usize].name
    }

    pub fn function(&self, id: FuncId) -> &FunctionDecl {
        &self.functions[id.0 as usize]
    }

    /// Mutable access by id. The analysis uses this for exactly one thing:
    /// setting `is_constexpr` on a newly-eligible function.
    pub fn function_mut(&mut self, id: FuncId) -> &mut FunctionDecl {
        &mut self.functions[id.0 as usize]
    }

    pub fn local(&self, id: LocalId) -> &LocalDecl {
        &self.locals[id.0 as usize]
    }

    /// Ids of all functions, in declaration order.
    pub fn function_ids(&self) -> impl Iterator<Item = FuncId> {
        (0..self.functions.len() as u32).map(FuncId)
    }

    /// The sole file-scoping gate for diagnostics and mutation.
    pub fn is_in_primary_file(&self, loc: SourceLoc) -> bool {
        loc.file == self.primary_file
    }

    /// Display string for a location: `path:line:column`.
    pub fn display_loc(&self, loc: SourceLoc) -> String {
        format!("{}:{}:{}", self.file(loc.file).path, loc.line, loc.column)
    }

    /// Deserialize a unit from JSON text.
    pub fn from_json(path: &Path, json: &str) -> ConstexprifyResult<Self> {
        serde_json::from_str(json).map_err(|e| ConstexprifyError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Load a JSON-serialized translation unit from disk.
pub fn load_translation_unit(path: &Path) -> ConstexprifyResult<TranslationUnit> {
    let content = fs::read_to_string(path).map_err(|e| ConstexprifyError::io(path, e))?;
    TranslationUnit::from_json(path, &content)
}
