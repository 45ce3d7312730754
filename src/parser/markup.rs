//! 标记解析器 - 把 HTML 风格的标记解析为元素树

use crate::dom::is_void_element;
use crate::element::{create_element, Attributes, Child, Element};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty tag name at {pos}")]
    EmptyTagName { pos: usize },
    #[error("expected '{expected}', got {found:?} at {pos}")]
    Expected {
        expected: char,
        found: Option<char>,
        pos: usize,
    },
    #[error("mismatched tags: <{open}> closed by </{close}> at {pos}")]
    MismatchedTag {
        open: String,
        close: String,
        pos: usize,
    },
    #[error("unclosed tag <{tag}>")]
    UnclosedTag { tag: String },
    #[error("unexpected closing tag at {pos}")]
    UnexpectedClosingTag { pos: usize },
}

/// 标记解析器
pub struct MarkupParser {
    input: Vec<char>,
    pos: usize,
}

impl MarkupParser {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// 解析全部顶层元素
    pub fn parse(&mut self) -> Result<Vec<Element>, ParseError> {
        let children = self.parse_children()?;
        if self.starts_with("</") {
            return Err(ParseError::UnexpectedClosingTag { pos: self.pos });
        }
        log::debug!("parsed {} root element(s)", children.len());
        Ok(children.into_iter().map(Child::into_element).collect())
    }

    /// 解析到结束标签或输入末尾为止
    fn parse_children(&mut self) -> Result<Vec<Child>, ParseError> {
        let mut children = Vec::new();

        while !self.at_end() {
            if self.starts_with("<!--") {
                self.skip_comment();
            } else if self.starts_with("</") {
                break;
            } else if self.current_char() == Some('<') {
                children.push(Child::Node(self.parse_element()?));
            } else {
                let text = self.parse_text();
                // 只有空白的文本不产生节点
                if !text.trim().is_empty() {
                    children.push(Child::from(text));
                }
            }
        }

        Ok(children)
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        self.expect('<')?;

        let tag_pos = self.pos;
        let tag_name = self.parse_name();
        if tag_name.is_empty() {
            return Err(ParseError::EmptyTagName { pos: tag_pos });
        }

        let mut attributes = Attributes::new();
        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some('>') => break,
                Some('/') if self.starts_with("/>") => break,
                None => return Err(ParseError::UnclosedTag { tag: tag_name }),
                _ => {}
            }
            let (name, value) = self.parse_attribute()?;
            attributes.insert(name, value);
        }

        // 自闭合标签
        if self.starts_with("/>") {
            self.pos += 2;
            return Ok(create_element(tag_name, Some(attributes), Vec::new()));
        }
        self.expect('>')?;

        // 空元素不需要结束标签，紧跟的 `</tag>` 一并吃掉
        if is_void_element(&tag_name) {
            self.skip_void_end_tag(&tag_name);
            return Ok(create_element(tag_name, Some(attributes), Vec::new()));
        }

        let children = self.parse_children()?;

        if !self.starts_with("</") {
            return Err(ParseError::UnclosedTag { tag: tag_name });
        }
        let close_pos = self.pos;
        self.pos += 2;
        let end_tag = self.parse_name();
        if end_tag != tag_name {
            return Err(ParseError::MismatchedTag {
                open: tag_name,
                close: end_tag,
                pos: close_pos,
            });
        }
        self.skip_whitespace();
        self.expect('>')?;

        Ok(create_element(tag_name, Some(attributes), children))
    }

    fn skip_void_end_tag(&mut self, tag_name: &str) {
        let start = self.pos;
        if self.starts_with("</") {
            self.pos += 2;
            if self.parse_name() == tag_name {
                self.skip_whitespace();
                if self.current_char() == Some('>') {
                    self.pos += 1;
                    return;
                }
            }
        }
        self.pos = start;
    }

    fn parse_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.') {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    /// 解析属性；没有值的属性视为 true
    fn parse_attribute(&mut self) -> Result<(String, JsonValue), ParseError> {
        let name_pos = self.pos;
        let name = self.parse_name();
        if name.is_empty() {
            return Err(ParseError::Expected {
                expected: '>',
                found: self.current_char(),
                pos: name_pos,
            });
        }

        self.skip_whitespace();
        if self.current_char() != Some('=') {
            return Ok((name, JsonValue::Bool(true)));
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = self.parse_attribute_value()?;
        Ok((name, JsonValue::String(decode_entities(&value))))
    }

    fn parse_attribute_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.current_char() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                // 无引号值
                let mut value = String::new();
                while let Some(c) = self.current_char() {
                    if c.is_whitespace() || c == '>' || c == '/' {
                        break;
                    }
                    value.push(c);
                    self.pos += 1;
                }
                return Ok(value);
            }
        };
        self.pos += 1;

        let mut value = String::new();
        while let Some(c) = self.current_char() {
            if c == quote {
                break;
            }
            value.push(c);
            self.pos += 1;
        }
        self.expect(quote)?;

        Ok(value)
    }

    fn parse_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if c == '<' {
                break;
            }
            text.push(c);
            self.pos += 1;
        }
        decode_entities(&text)
    }

    fn skip_comment(&mut self) {
        self.pos += 4;
        while !self.at_end() && !self.starts_with("-->") {
            self.pos += 1;
        }
        self.pos = (self.pos + 3).min(self.input.len());
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.input.get(self.pos + i) == Some(&c))
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.current_char() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: c,
                found: self.current_char(),
                pos: self.pos,
            })
        }
    }
}

/// 解码常用的字符实体
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
