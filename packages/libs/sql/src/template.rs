//! 토큰 치환 템플릿 엔진
//!
//! `{token}` 슬롯이 있는 SQL 템플릿을 리터럴/슬롯 조각 목록으로 파싱한 뒤,
//! 렌더링 시점에 값을 끼워 넣습니다. 조각 단위로 합치기 때문에 치환된 값이
//! 다시 토큰으로 재매칭되는 일이 없습니다.

/// 템플릿 조각
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    /// 그대로 출력되는 텍스트
    Lit(String),

    /// `{name}` 슬롯 (이름만 보관)
    Slot(String),
}

/// 파싱된 템플릿
#[derive(Debug, Clone)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    /// 템플릿 텍스트 파싱
    ///
    /// 슬롯 이름은 ASCII 영숫자와 `_`만 허용하며, 그 외의 중괄호는
    /// 리터럴로 취급합니다. 파싱은 실패하지 않습니다.
    pub fn parse(text: &str) -> Self {
        let mut fragments = Vec::new();
        let mut lit = String::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            let Some(close_rel) = rest[open + 1..].find('}') else {
                break;
            };
            let close = open + 1 + close_rel;
            let name = &rest[open + 1..close];

            if !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                lit.push_str(&rest[..open]);
                if !lit.is_empty() {
                    fragments.push(Fragment::Lit(std::mem::take(&mut lit)));
                }
                fragments.push(Fragment::Slot(name.to_string()));
            } else {
                lit.push_str(&rest[..close + 1]);
            }
            rest = &rest[close + 1..];
        }

        lit.push_str(rest);
        if !lit.is_empty() {
            fragments.push(Fragment::Lit(lit));
        }

        Template { fragments }
    }

    /// 슬롯에 값을 채워 최종 문자열 생성
    ///
    /// 슬롯 이름은 대소문자 구분 없이 매칭하고, 값이 주어지지 않은 슬롯은
    /// 빈 문자열로 렌더링됩니다.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Lit(text) => out.push_str(text),
                Fragment::Slot(name) => {
                    if let Some((_, value)) =
                        values.iter().find(|(key, _)| key.eq_ignore_ascii_case(name))
                    {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    /// 템플릿에 등장하는 슬롯 이름 목록 (등장 순서)
    pub fn slots(&self) -> Vec<&str> {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Slot(name) => Some(name.as_str()),
                Fragment::Lit(_) => None,
            })
            .collect()
    }
}
