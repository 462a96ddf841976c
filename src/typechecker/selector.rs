//! Selector chain resolution.
//!
//! `root#field#0#@type` is folded left to right starting from the root
//! variable's type. Casts are assertions: the current type, taken as the
//! expected side, must already accept the cast target.

use super::*;
use crate::types::Primitive;

impl TypeChecker {
    pub(super) fn type_of_selector(&mut self, sel: &Selector, meta: &MetaNode) -> Option<Type> {
        let path = sel.path();
        let (first, rest) = path.split_first()?;

        let SelectorElem::Name(root) = first else {
            self.report(
                codes::MALFORMED_SELECTOR,
                meta,
                "selector must start with a variable".to_string(),
            );
            return None;
        };
        let Some(mut cur) = self.scopes.get_var(self.current, root).cloned() else {
            self.report(
                codes::UNKNOWN_VARIABLE,
                meta,
                format!("unknown variable {}", root),
            );
            return None;
        };
        // The root's own definition failed and was reported there
        if matches!(cur, Type::Undefined) {
            return None;
        }

        for elem in rest {
            match elem {
                SelectorElem::Cast(target) => {
                    if !cur.equals(target) {
                        let diag = Diagnostic::error(codes::MALFORMED_SELECTOR)
                            .message(format!("cannot cast {} to {}", cur, target))
                            .span(meta.span.clone())
                            .node(NodeKind::Typecast)
                            .expected(cur.describe())
                            .actual(target.describe())
                            .build();
                        self.diagnostics.push(diag);
                        return None;
                    }
                    cur = target.clone();
                }
                SelectorElem::Name(field) => {
                    let Some(st) = cur.as_struct() else {
                        self.report(
                            codes::MALFORMED_SELECTOR,
                            meta,
                            format!("cannot select field {} of {}", field, cur),
                        );
                        return None;
                    };
                    let Some(field_ty) = st.field(field).cloned() else {
                        self.report(
                            codes::UNKNOWN_FIELD,
                            meta,
                            format!("{} has no field {}", cur, field),
                        );
                        return None;
                    };
                    cur = field_ty;
                }
                SelectorElem::IndexConst(_) | SelectorElem::IndexSelector(_) => {
                    if let SelectorElem::IndexSelector(index) = elem {
                        let index_ty = self.type_of_selector(index, meta)?;
                        if !Type::INT.equals(&index_ty) {
                            self.mismatch(meta, &Type::INT, &index_ty, "selector index");
                            return None;
                        }
                    }
                    match cur.primitive_tag() {
                        // Indexing a string ends the chain; later elements are not looked at.
                        Primitive::String => return Some(Type::result(Type::CHAR)),
                        Primitive::Array => {
                            let Type::Array(item) = cur else {
                                return None;
                            };
                            cur = Type::result(*item);
                        }
                        _ => {
                            self.report(
                                codes::MALFORMED_SELECTOR,
                                meta,
                                format!("can only index arrays, got {}", cur),
                            );
                            return None;
                        }
                    }
                }
            }
        }

        Some(cur)
    }
}
