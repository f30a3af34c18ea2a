//! Shared fixtures: builders for Telegram Desktop HTML export markup.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::{TempDir, tempdir};

/// A regular text message with a timestamp.
pub fn text_message(id: u32, ts: &str) -> String {
    let short = ts.get(11..16).unwrap_or(ts);
    format!(
        r#"<div class="message default clearfix" id="message{id}">
 <div class="pull_left userpic_wrap"><div class="userpic userpic1" style="width: 42px; height: 42px"><div class="initials" style="line-height: 42px">A</div></div></div>
 <div class="body">
  <div class="pull_right date details" title="{ts}">{short}</div>
  <div class="from_name">Alice</div>
  <div class="text">Message {id}</div>
 </div>
</div>
"#
    )
}

/// A sticker placeholder: a body without any timestamp element.
pub fn sticker(id: u32) -> String {
    format!(
        r#"<div class="message default clearfix joined" id="message{id}">
 <div class="body">
  <div class="media_wrap clearfix"><a class="sticker_wrap clearfix pull_left" href="stickers/sticker.webp"><img class="sticker" src="stickers/sticker.webp_thumb.jpg"/></a></div>
 </div>
</div>
"#
    )
}

/// A date separator or other service notice.
pub fn service(id: i32, text: &str) -> String {
    format!(
        r#"<div class="message service" id="message{id}">
 <div class="body details">{text}</div>
</div>
"#
    )
}

/// A message forwarding another one; the nested body carries no
/// `div.pull_right.date.details`.
pub fn forwarded(id: u32, ts: &str, original_ts: &str) -> String {
    format!(
        r#"<div class="message default clearfix" id="message{id}">
 <div class="body">
  <div class="pull_right date details" title="{ts}">x</div>
  <div class="from_name">Bob</div>
  <div class="forwarded body">
   <div class="from_name">Channel<span class="date details" title="{original_ts}"> {original_ts}</span></div>
   <div class="text">forwarded</div>
  </div>
 </div>
</div>
"#
    )
}

/// Wraps entries in a full export page.
pub fn page(entries: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
 <head>
  <meta charset="utf-8"/>
  <title>Exported Data</title>
  <link href="css/style.css" rel="stylesheet"/>
 </head>
 <body>
  <div class="page_wrap">
   <div class="page_header"><div class="content"><div class="text bold">Test Chat</div></div></div>
   <div class="page_body chat_page">
    <div class="history">
{}
    </div>
   </div>
  </div>
 </body>
</html>
"#,
        entries.concat()
    )
}

/// Writes `(name, content)` pairs into `dir`.
pub fn write_files(dir: &Path, files: &[(&str, String)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

/// Two fragments: `messages.html` with two messages and
/// `messages2.html` with one message and a sticker. Also drops files an
/// export directory typically contains next to the fragments.
pub fn two_fragment_export() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    write_files(
        dir.path(),
        &[
            (
                "messages2.html",
                page(&[text_message(3, "01.01.2021 10:10:00"), sticker(4)]),
            ),
            (
                "messages.html",
                page(&[
                    service(-1, "1 January 2021"),
                    text_message(1, "01.01.2021 10:00:00"),
                    text_message(2, "01.01.2021 10:05:00"),
                ]),
            ),
            ("style.css", "body {}".to_string()),
        ],
    );
    fs::create_dir(dir.path().join("photos")).unwrap();
    dir
}
