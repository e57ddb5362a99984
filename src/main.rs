fn main() -> sticker_sheet::Result<()> {
    sticker_sheet::run(wild::args_os())
}
