use reqprobe::error::AppResult;

fn main() -> AppResult<()> {
    reqprobe::entry::run()
}
