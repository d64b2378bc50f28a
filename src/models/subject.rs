/// 题目分区（科目下的出题范围）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// 分区 id（用于拼接复合分区键）
    pub id: &'static str,
    /// 面向学生的标签
    pub label: &'static str,
}

/// 科目枚举
///
/// 只覆盖开放了 AI 出题的科目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// اللغة العربية
    Arabic,
    /// الفلسفة
    Philosophy,
    /// التاريخ
    History,
    /// اللغة الإنجليزية
    English,
    /// اللغة الفرنسية
    French,
}

impl Subject {
    /// 获取科目 id（数据库里的分区键前缀）
    pub fn id(self) -> &'static str {
        match self {
            Subject::Arabic => "arabic",
            Subject::Philosophy => "philosophy",
            Subject::History => "history",
            Subject::English => "english",
            Subject::French => "french",
        }
    }

    /// 获取阿拉伯语显示名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Arabic => "اللغة العربية",
            Subject::Philosophy => "الفلسفة",
            Subject::History => "التاريخ",
            Subject::English => "اللغة الإنجليزية",
            Subject::French => "اللغة الفرنسية",
        }
    }

    /// 从 id 解析科目
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "arabic" => Some(Subject::Arabic),
            "philosophy" => Some(Subject::Philosophy),
            "history" => Some(Subject::History),
            "english" => Some(Subject::English),
            "french" => Some(Subject::French),
            _ => None,
        }
    }

    /// 该科目下可选的出题分区
    pub fn sections(self) -> &'static [Section] {
        match self {
            Subject::Arabic => &[Section {
                id: "criticism",
                label: "رواد التقاويم النقدية",
            }],
            Subject::Philosophy => &[Section {
                id: "philosophy_article",
                label: "الأقوال والمواقف الفلسفية",
            }],
            Subject::History => &[
                Section {
                    id: "dates",
                    label: "التواريخ والمعالم",
                },
                Section {
                    id: "characters",
                    label: "الشخصيات التاريخية",
                },
                Section {
                    id: "terms",
                    label: "المصطلحات والمفاهيم",
                },
            ],
            Subject::English => &[
                Section {
                    id: "grammar",
                    label: "Grammar & Rules",
                },
                Section {
                    id: "terms",
                    label: "Vocabulary",
                },
            ],
            Subject::French => &[
                Section {
                    id: "grammar",
                    label: "Grammaire & Conjugaison",
                },
                Section {
                    id: "terms",
                    label: "Lexique & Vocabulaire",
                },
            ],
        }
    }

    /// 出题时注入 prompt 的科目专项指令
    ///
    /// 没有专项指令的科目返回空串。
    pub fn specialized_instruction(self) -> &'static str {
        match self {
            Subject::Arabic => {
                "ركز على المدارس الأدبية، خصائص الأسلوب، رواد النهضة، والظواهر النقدية (الالتزام، الرمز، الحزن...)."
            }
            Subject::Philosophy => {
                "ركز على الحجج، أسماء الفلاسفة، الأقوال المأثورة، والمواقف المتعارضة."
            }
            Subject::History => {
                "ركز بدقة على التواريخ (اليوم/الشهر/السنة)، الشخصيات وجنسياتهم، والمصطلحات التاريخية."
            }
            Subject::English | Subject::French => "",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_roundtrip() {
        for subject in [
            Subject::Arabic,
            Subject::Philosophy,
            Subject::History,
            Subject::English,
            Subject::French,
        ] {
            assert_eq!(Subject::from_id(subject.id()), Some(subject));
        }
        assert_eq!(Subject::from_id("math"), None);
    }

    #[test]
    fn test_history_sections() {
        let ids: Vec<&str> = Subject::History.sections().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["dates", "characters", "terms"]);
    }

    #[test]
    fn test_language_subjects_have_no_specialized_instruction() {
        assert!(Subject::English.specialized_instruction().is_empty());
        assert!(Subject::French.specialized_instruction().is_empty());
        assert!(!Subject::History.specialized_instruction().is_empty());
    }
}
