use super::models::IniFile;

/// 序列化回 winapp2.ini 方言，节之间以空行分隔
pub fn write_ini(file: &IniFile) -> String {
    let mut out = String::new();

    for line in &file.header {
        out.push_str(line);
        out.push('\n');
    }

    for (i, section) in file.sections.iter().enumerate() {
        if i > 0 || !file.header.is_empty() {
            out.push('\n');
        }
        for line in &section.comments {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", section.name));
        for key in &section.keys {
            out.push_str(&format!("{}={}\n", key.name, key.value));
        }
    }

    if !file.trailing.is_empty() {
        out.push('\n');
        for line in &file.trailing {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}
