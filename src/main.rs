fn main() {
    hitmap_lib::run()
}
