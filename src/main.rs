fn main() {
    fragment_loader::web::start();
}
