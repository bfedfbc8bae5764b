use domain::parse_topic_filters;

/// 订阅用的 topic 过滤器列表（已去除空白项）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilters(Vec<String>);

impl TopicFilters {
    /// 解析逗号分隔形式，例如 `home/+/telemetry, home/+/alerts`。
    pub fn parse(input: &str) -> Self {
        Self(parse_topic_filters(input))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for TopicFilters {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for TopicFilters {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Vec<String>> for TopicFilters {
    fn from(value: Vec<String>) -> Self {
        Self(
            value
                .into_iter()
                .map(|topic| topic.trim().to_string())
                .filter(|topic| !topic.is_empty())
                .collect(),
        )
    }
}

impl From<&[&str]> for TopicFilters {
    fn from(value: &[&str]) -> Self {
        Self::from(value.iter().map(|topic| topic.to_string()).collect::<Vec<_>>())
    }
}
