/// 解析逗号分隔的 topic 过滤器列表。
///
/// 按 `,` 切分，去除首尾空白，丢弃空项；顺序保持输入顺序。
pub fn parse_topic_filters(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
