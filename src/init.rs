//! Starter config scaffolding for `makepub init`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CONFIG_FILENAME: &str = "makepub.yaml";

const TEMPLATE_EN: &str = r#"# makepub configuration
author: Author Name
title: Book Title
lang: en
# uuid: 00000000-0000-0000-0000-000000000000
# publisher: Publisher Name
# cover: cover.jpg
# media: media
spine:
  # - cover_page: cover.jpg
  - nav_page: true
  - intro.md
  - title: Part One
    nodes:
      - chapter1.md
      - chapter2.md
"#;

const TEMPLATE_ZH: &str = r#"# makepub 配置
author: 作者
title: 书名
lang: zh
# uuid: 00000000-0000-0000-0000-000000000000
# publisher: 出版社
# cover: cover.jpg
# media: media
nav_title: 目录
cover_title: 封面
spine:
  # - cover_page: cover.jpg
  - nav_page: true
  - intro.md
  - title: 第一部
    nodes:
      - chapter1.md
      - chapter2.md
"#;

/// The starter template for a language selector (`zh`, or English for
/// anything else).
pub fn template(lang: &str) -> &'static str {
    match lang {
        "zh" => TEMPLATE_ZH,
        _ => TEMPLATE_EN,
    }
}

/// Write a starter config file into `dir` and return its path.
///
/// Refuses to overwrite an existing config.
pub fn scaffold(dir: &Path, lang: &str) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        return Err(Error::Config(format!("{} already exists", path.display())));
    }
    fs::write(&path, template(lang))?;
    Ok(path)
}
