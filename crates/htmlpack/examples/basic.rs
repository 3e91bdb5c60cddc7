use std::sync::Arc;

use htmlpack::{Bundler, BundlerOptions, Document, MemoryAccessor, ResourceUrl};

fn main() {
  let accessor = MemoryAccessor::new();

  let entry = ResourceUrl::parse("https://example.com/app.html").unwrap();
  let dep = ResourceUrl::parse("https://example.com/widget.html").unwrap();

  let mut app = Document::shell();
  let head = app.head().unwrap();
  let link = app.create_element("link", [("rel", "import"), ("href", "widget.html")]);
  app.append_child(head, link);
  accessor.insert_document(entry.clone(), app);

  let mut widget = Document::shell();
  let body = widget.body().unwrap();
  let div = widget.create_element("div", [("id", "widget")]);
  widget.append_child(body, div);
  accessor.insert_document(dep, widget);

  let bundler =
    Bundler::new(BundlerOptions::default(), Arc::new(accessor)).expect("options are valid");
  let output = bundler.bundle(&["https://example.com/app.html"]).expect("bundling succeeds");

  for bundle in output.bundles.values() {
    println!("{} <- {:?}", bundle.url, bundle.files);
  }
}
