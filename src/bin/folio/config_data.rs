use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use folio::text_utils::current_year;

const CONFIG_SAMPLE: &str = r#"[personal]
name = "Your Name"
# Used as the author of new posts. If empty, the OS user real name is used
author = ""
activity_start_year = {{YEAR}}

# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
template_dir = "res/template"
public_dir = "res/public"

# kind is either json_file or memory
[store]
kind = "json_file"
location = "content.json"

[site]
header_buffer = 150.0
categories = ["web", "mobile", "other"]
default_cover_image = "/public/images/head-shot.jpg"
default_author_image = "/public/images/default-avatar.jpg"

[server]
address = "0.0.0.0"
port = 8001

# Remove this section to log to the console only
[log]
level = "Info"
log_to_console = true
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    let mut file = File::create(file_path)?;
    file.write_all(get_sample_cfg().as_bytes())
}

fn get_sample_cfg() -> String {
    CONFIG_SAMPLE.replace("{{YEAR}}", &current_year().to_string())
}
