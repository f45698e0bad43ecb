//! Completion handler.
//!
//! Provides completions for:
//! - Names declared before the cursor in enclosing scopes (variables,
//!   parameters, functions)
//! - Language keywords and built-in types
//! - Built-in library functions, documented on resolve

use std::collections::HashSet;

use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionParams, CompletionResponse, Documentation,
    MarkupContent, MarkupKind,
};
use pl12d_syntax::{kind, NodeId, Point, SyntaxTree};

use super::describe::{declared_type, doc_comment, doc_markdown, function_signature};
use super::to_point;

/// Language keywords.
pub const KEYWORDS: &[&str] = &[
    "for", "do", "while", "if", "else", "goto", "switch", "default", "case", "return", "include",
    "define",
];

/// Built-in types.
pub const TYPES: &[&str] = &[
    "Angle_Box", "Apply_Function", "Apply_Many_Function", "Arc", "Attribute",
    "Attribute_Blob", "Attributes", "Attributes_Box", "Billboard_Box",
    "Bitmap_Fill_Box", "Bitmap_List_Box", "Button", "Chainage_Box", "Choice_Box",
    "Colour_Box", "Colour_Message_Box", "Connection", "Curve", "Database_Result",
    "Date_Time_Box", "Delete_Query", "Directory_Box", "Drainage_Network", "Draw_Box",
    "Dynamic_Element", "Dynamic_Integer", "Dynamic_Real", "Dynamic_Text", "Element",
    "Equality_Info", "Equality_Label", "File", "File_Box", "Function", "Function_Box",
    "Function_Property_Collection", "Graph_Box", "GridCtrl_Box", "Guid",
    "Horizontal_Group", "HyperLink_Box", "Input_Box", "Insert_Query", "Integer",
    "Integer64", "Integer_Box", "Integer_Set", "Justify_Box", "Kerb_Return_Function",
    "Line", "Linestyle_Box", "List", "ListCtrl_Box", "List_Box", "Log_Box", "Log_Line",
    "Macro_Function", "Manual_Condition", "Manual_Query", "Map_File", "Map_File_Box",
    "Matrix3", "Matrix4", "Menu", "Message_Box", "Model", "Model_Box", "Name_Box",
    "Named_Tick_Box", "Names", "New_Select_Box", "New_XYZ_Box", "Overlay_Widget",
    "Panel", "Parabola", "Parameter_Collection", "Plot_Parameter_File", "Plotter_Box",
    "Point", "Polygon_Box", "Process_Handle", "Query_Condition", "Real_Box", "Real",
    "Real_Set", "Report_Box", "SDR_Attribute", "Screen_Text", "Segment", "Select_Box",
    "Select_Boxes", "Select_Button", "Select_Query", "Selection", "Sheet_Panel",
    "Sheet_Size_Box", "Slider_Box", "Source_Box", "Spiral", "String", "Symbol_Box",
    "Tab_Box", "Target_Box", "Template_Box", "Text", "Text_Edit_Box", "Text_Set",
    "Text_Style_Box", "Text_Units_Box", "Textstyle_Data", "Textstyle_Data_Box",
    "Texture_Box", "Tick_Box", "Time_Zone_Box", "Time_Zone_Box_Box", "Tin", "Tin_Box",
    "Transaction", "Tree_Box", "Tree_Page", "Uid", "Undo", "Undo_List", "Update_Query",
    "Vector2", "Vector3", "Vector4", "Vertical_Group", "View", "View_Box", "Widget",
    "Widget_Pages", "XML_Document", "XML_Node", "XYZ_Box", "void",
];

/// A documented built-in library function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryFunction {
    /// Function name.
    pub name: &'static str,
    /// Full prototype.
    pub signature: &'static str,
    /// One-paragraph description.
    pub summary: &'static str,
}

/// Built-in library functions.
pub const LIBRARY: &[LibraryFunction] = &[
    LibraryFunction {
        name: "Print",
        signature: "void Print(Text msg)",
        summary: "Print the Text msg to the Output Window.",
    },
    LibraryFunction {
        name: "Clear_console",
        signature: "void Clear_console()",
        summary: "Clear the Output Window.",
    },
    LibraryFunction {
        name: "Get_number_of_command_arguments",
        signature: "Integer Get_number_of_command_arguments()",
        summary: "Return the number of arguments the macro was run with.",
    },
    LibraryFunction {
        name: "Get_command_argument",
        signature: "Integer Get_command_argument(Integer i, Text &argument)",
        summary: "Get the i'th command line argument and return it in argument. A function return value of zero indicates the argument was successfully returned.",
    },
    LibraryFunction {
        name: "Exit",
        signature: "Integer Exit(Integer code)",
        summary: "Terminate the macro with the exit status code.",
    },
    LibraryFunction {
        name: "Text_length",
        signature: "Integer Text_length(Text text)",
        summary: "Return the number of characters in text.",
    },
    LibraryFunction {
        name: "To_text",
        signature: "Text To_text(Integer value)",
        summary: "Convert value to its Text representation.",
    },
];

/// Look up a built-in library function by name.
pub fn library_function(name: &str) -> Option<&'static LibraryFunction> {
    LIBRARY.iter().find(|function| function.name == name)
}

/// Handle a completion request.
pub fn handle_completion(
    params: &CompletionParams,
    tree: &SyntaxTree,
    filter: bool,
) -> Option<CompletionResponse> {
    let point = to_point(params.text_document_position.position);
    let items = if filter {
        completion_items(tree, point)
    } else {
        static_items()
    };
    tracing::debug!(count = items.len(), filter, "completion");
    Some(CompletionResponse::Array(items))
}

/// Handle a `completionItem/resolve` request.
///
/// Library functions get their documentation attached; anything already
/// documented is returned unchanged.
pub fn resolve_completion(mut item: CompletionItem) -> CompletionItem {
    if item.documentation.is_none() {
        if let Some(function) = library_function(&item.label) {
            item.documentation = Some(markdown(doc_markdown(function.signature, function.summary)));
        }
    }
    item
}

/// Context-sensitive completions at `point`.
pub fn completion_items(tree: &SyntaxTree, point: Point) -> Vec<CompletionItem> {
    let node = cursor_node(tree, point);
    let parent = tree.parent(node);

    // Typing a new name: nothing sensible to offer.
    if is_declaration_name(tree, node) || is_function_name(tree, node) {
        return Vec::new();
    }

    if node == tree.root() || parent == Some(tree.root()) {
        return keyword_items().chain(type_items()).collect();
    }

    let mut items = reachable_declarations(tree, node);
    items.extend(keyword_items());
    items.extend(type_items());
    items.extend(library_items());
    items
}

/// Every static item, in table order.
pub fn static_items() -> Vec<CompletionItem> {
    keyword_items()
        .chain(type_items())
        .chain(library_items())
        .collect()
}

/// The node under the cursor, widened to the outermost node with the same
/// span so error-recovery wrappers are seen as the node itself.
fn cursor_node(tree: &SyntaxTree, point: Point) -> NodeId {
    let mut node = tree.node_at(point).unwrap_or_else(|| tree.root());
    while let Some(parent) = tree.parent(node) {
        if tree.span(parent) != tree.span(node) {
            break;
        }
        node = parent;
    }
    node
}

fn is_declaration_name(tree: &SyntaxTree, node: NodeId) -> bool {
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        match tree.kind(parent) {
            kind::DECLARATION => return true,
            kind::INIT_DECLARATOR | kind::ARRAY_DECLARATOR | kind::POINTER_DECLARATOR
                if tree.child_by_field(parent, kind::field::DECLARATOR) == Some(current) =>
            {
                current = parent;
            }
            _ => return false,
        }
    }
    false
}

fn is_function_name(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.parent(node).is_some_and(|parent| {
        tree.kind(parent) == kind::FUNCTION_DECLARATOR
            && tree.child_by_field(parent, kind::field::DECLARATOR) == Some(node)
    })
}

/// Declarations visible from `node`: anything declared on an earlier line in
/// an enclosing scope, plus the parameters of the enclosing function.
/// Innermost names come first and shadow outer ones.
fn reachable_declarations(tree: &SyntaxTree, node: NodeId) -> Vec<CompletionItem> {
    let row = tree.span(node).start.row;
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for scope in tree.ancestors(node) {
        if tree.kind(scope) == kind::FUNCTION_DEFINITION {
            for parameter in parameters(tree, scope) {
                push_variable(tree, parameter, &mut seen, &mut items);
            }
        }

        for &child in tree.children(scope) {
            if tree.span(child).start.row >= row {
                break;
            }
            match tree.kind(child) {
                kind::DECLARATION => {
                    for declarator in declarators(tree, child) {
                        if let Some(name) = tree.declared_name(declarator) {
                            push_variable(tree, name, &mut seen, &mut items);
                        }
                    }
                }
                kind::FUNCTION_DEFINITION => {
                    if let Some(item) = function_item(tree, child) {
                        if seen.insert(item.label.clone()) {
                            items.push(item);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    items
}

fn declarators(tree: &SyntaxTree, declaration: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    tree.children(declaration)
        .iter()
        .copied()
        .filter(move |&child| tree.node(child).field == Some(kind::field::DECLARATOR))
}

fn parameters(tree: &SyntaxTree, definition: NodeId) -> Vec<NodeId> {
    let Some(list) = tree
        .function_declarator(definition)
        .and_then(|declarator| tree.child_by_field(declarator, kind::field::PARAMETERS))
    else {
        return Vec::new();
    };
    tree.children(list)
        .iter()
        .filter(|&&child| tree.kind(child) == kind::PARAMETER_DECLARATION)
        .filter_map(|&parameter| {
            let declarator = tree.child_by_field(parameter, kind::field::DECLARATOR)?;
            tree.declared_name(declarator)
        })
        .collect()
}

fn push_variable(
    tree: &SyntaxTree,
    name: NodeId,
    seen: &mut HashSet<String>,
    items: &mut Vec<CompletionItem>,
) {
    let label = tree.text(name).to_string();
    if !seen.insert(label.clone()) {
        return;
    }
    items.push(CompletionItem {
        label,
        kind: Some(CompletionItemKind::VARIABLE),
        detail: declared_type(tree, name).map(str::to_string),
        ..Default::default()
    });
}

fn function_item(tree: &SyntaxTree, definition: NodeId) -> Option<CompletionItem> {
    let name = tree.function_name(definition)?;
    Some(CompletionItem {
        label: tree.text(name).to_string(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail: function_signature(tree, definition),
        documentation: doc_comment(tree, definition)
            .map(|doc| Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::PlainText,
                value: doc,
            })),
        ..Default::default()
    })
}

fn keyword_items() -> impl Iterator<Item = CompletionItem> {
    KEYWORDS.iter().map(|&keyword| CompletionItem {
        label: keyword.to_string(),
        kind: Some(CompletionItemKind::KEYWORD),
        ..Default::default()
    })
}

fn type_items() -> impl Iterator<Item = CompletionItem> {
    TYPES.iter().map(|&ty| CompletionItem {
        label: ty.to_string(),
        kind: Some(CompletionItemKind::CLASS),
        ..Default::default()
    })
}

fn library_items() -> impl Iterator<Item = CompletionItem> {
    LIBRARY.iter().map(|function| CompletionItem {
        label: function.name.to_string(),
        kind: Some(CompletionItemKind::FUNCTION),
        detail: Some(function.signature.to_string()),
        ..Default::default()
    })
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}
