//! Node kinds and field names produced by the grammar.
//!
//! Only the kinds the language server inspects are listed.

#![allow(missing_docs)]

pub const TRANSLATION_UNIT: &str = "translation_unit";
pub const FUNCTION_DEFINITION: &str = "function_definition";
pub const FUNCTION_DECLARATOR: &str = "function_declarator";
pub const PARAMETER_DECLARATION: &str = "parameter_declaration";
pub const COMPOUND_STATEMENT: &str = "compound_statement";
pub const DECLARATION: &str = "declaration";
pub const INIT_DECLARATOR: &str = "init_declarator";
pub const ARRAY_DECLARATOR: &str = "array_declarator";
pub const POINTER_DECLARATOR: &str = "pointer_declarator";
pub const IF_STATEMENT: &str = "if_statement";
pub const ELSE_CLAUSE: &str = "else_clause";
pub const WHILE_STATEMENT: &str = "while_statement";
pub const FOR_STATEMENT: &str = "for_statement";
pub const SWITCH_STATEMENT: &str = "switch_statement";
pub const CALL_EXPRESSION: &str = "call_expression";
pub const ARGUMENT_LIST: &str = "argument_list";
pub const PREPROC_DEF: &str = "preproc_def";
pub const IDENTIFIER: &str = "identifier";
pub const COMMENT: &str = "comment";
pub const ERROR: &str = "ERROR";

pub const OPEN_PAREN: &str = "(";
pub const CLOSE_PAREN: &str = ")";
pub const CLOSE_BRACE: &str = "}";
pub const COMMA: &str = ",";

/// Field names.
pub mod field {
    pub const TYPE: &str = "type";
    pub const DECLARATOR: &str = "declarator";
    pub const BODY: &str = "body";
    pub const PARAMETERS: &str = "parameters";
    pub const FUNCTION: &str = "function";
    pub const ALTERNATIVE: &str = "alternative";
    pub const VALUE: &str = "value";
}
