//! Helpers for the declaration shapes of C-family source.

use crate::kind::{self, field};
use crate::tree::{NodeId, SyntaxTree};

impl SyntaxTree {
    /// The `function_declarator` of a function definition, looking through
    /// pointer declarators such as `Integer *Foo()`.
    pub fn function_declarator(&self, definition: NodeId) -> Option<NodeId> {
        let mut current = self.child_by_field(definition, field::DECLARATOR)?;
        loop {
            match self.kind(current) {
                kind::FUNCTION_DECLARATOR => return Some(current),
                kind::POINTER_DECLARATOR => {
                    current = self.child_by_field(current, field::DECLARATOR)?;
                }
                _ => return None,
            }
        }
    }

    /// Name of a function definition.
    pub fn function_name(&self, definition: NodeId) -> Option<NodeId> {
        let declarator = self.function_declarator(definition)?;
        let name = self.child_by_field(declarator, field::DECLARATOR)?;
        (self.kind(name) == kind::IDENTIFIER).then_some(name)
    }

    /// Identifier introduced by a declarator, looking through init, array
    /// and pointer declarators.
    pub fn declared_name(&self, declarator: NodeId) -> Option<NodeId> {
        let mut current = declarator;
        loop {
            match self.kind(current) {
                kind::IDENTIFIER => return Some(current),
                kind::INIT_DECLARATOR | kind::ARRAY_DECLARATOR | kind::POINTER_DECLARATOR => {
                    current = self.child_by_field(current, field::DECLARATOR)?;
                }
                _ => return None,
            }
        }
    }

    /// Nearest strict ancestor of the given kind.
    pub fn enclosing(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| self.kind(ancestor) == kind)
    }

    /// Number of blocks strictly enclosing the node.
    pub fn block_depth(&self, id: NodeId) -> usize {
        self.ancestors(id)
            .filter(|&ancestor| self.kind(ancestor) == kind::COMPOUND_STATEMENT)
            .count()
    }

    /// Sibling immediately before the node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        position.checked_sub(1).map(|index| siblings[index])
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{Point, SyntaxParser};
    use crate::kind;

    #[test]
    fn test_function_name_and_declarator() {
        let tree = SyntaxParser::new()
            .unwrap()
            .parse("Integer Add(Integer a, Integer b) {\n    return a + b;\n}\n")
            .unwrap();
        let definition = tree
            .preorder(tree.root())
            .find(|&id| tree.kind(id) == kind::FUNCTION_DEFINITION)
            .unwrap();
        let name = tree.function_name(definition).unwrap();
        assert_eq!(tree.text(name), "Add");
        let declarator = tree.function_declarator(definition).unwrap();
        assert_eq!(tree.text(declarator), "Add(Integer a, Integer b)");
    }

    #[test]
    fn test_declared_name_through_declarators() {
        let tree = SyntaxParser::new()
            .unwrap()
            .parse("void main() {\n    Integer a = 1, b;\n    Text items[3];\n}\n")
            .unwrap();
        let tree = &tree;
        let names: Vec<&str> = tree
            .preorder(tree.root())
            .filter(|&id| tree.kind(id) == kind::DECLARATION)
            .flat_map(|declaration| {
                tree.children(declaration)
                    .iter()
                    .copied()
                    .filter(move |&child| tree.node(child).field == Some(kind::field::DECLARATOR))
            })
            .filter_map(|declarator| tree.declared_name(declarator))
            .map(|name| tree.text(name))
            .collect();
        assert_eq!(names, ["a", "b", "items"]);
    }

    #[test]
    fn test_block_depth_and_enclosing() {
        let tree = SyntaxParser::new()
            .unwrap()
            .parse("void main() {\n    while (1) {\n        Integer x;\n    }\n}\n")
            .unwrap();
        let name = tree.node_at(Point::new(2, 16)).unwrap();
        assert_eq!(tree.text(name), "x");
        assert_eq!(tree.block_depth(name), 2);
        let declaration = tree.enclosing(name, kind::DECLARATION).unwrap();
        assert!(tree.enclosing(declaration, kind::WHILE_STATEMENT).is_some());
        assert!(tree.enclosing(declaration, kind::FOR_STATEMENT).is_none());
    }

    #[test]
    fn test_prev_sibling() {
        let tree = SyntaxParser::new()
            .unwrap()
            .parse("// doc\nvoid main() {}\n")
            .unwrap();
        let definition = tree
            .preorder(tree.root())
            .find(|&id| tree.kind(id) == kind::FUNCTION_DEFINITION)
            .unwrap();
        let comment = tree.prev_sibling(definition).unwrap();
        assert_eq!(tree.kind(comment), kind::COMMENT);
        assert!(tree.prev_sibling(comment).is_none());
    }
}
