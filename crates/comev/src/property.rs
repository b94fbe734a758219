//! Envelope generators for automation property accessors
//!
//! Every method on the event-class interfaces is a property get or set
//! over a BSTR or a boolean, so the envelope plumbing is stamped out by
//! macro. Getters send only ORPCTHIS and receive ORPCTHAT, the value and
//! the status; setters send the value and receive ORPCTHAT plus status.

/// A `[propget]` returning a BSTR behind a unique pointer
macro_rules! bstr_get_operation {
    ($op:ident, $req:ident, $resp:ident, $opnum:expr, $name:literal, $field:ident) => {
        #[derive(Debug, Default)]
        pub struct $op {
            pub this: ::dcom::OrpcThis,
            pub that: ::dcom::OrpcThat,
            pub $field: Option<::oaut::BStr>,
            pub return_code: i32,
        }

        impl ::dcom::Operation for $op {
            fn op_num(&self) -> u16 {
                $opnum
            }

            fn op_name(&self) -> &'static str {
                $name
            }

            fn marshal_ndr_request(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_request_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.this, w)?;
                w.write_deferred()?;
                Ok(())
            }

            fn unmarshal_ndr_request(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let this = <::dcom::OrpcThis as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.this = <::dcom::OrpcThis as ::ndr::NdrPointee>::take_repr(this, r)?;
                Ok(())
            }

            fn marshal_ndr_response(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_response_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.that, w)?;
                w.write_deferred()?;
                w.write_pointer(self.$field.as_ref())?;
                w.write_deferred()?;
                w.write_i32(self.return_code);
                Ok(())
            }

            fn unmarshal_ndr_response(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let that = <::dcom::OrpcThat as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.that = <::dcom::OrpcThat as ::ndr::NdrPointee>::take_repr(that, r)?;
                let value = r.read_pointer::<::oaut::BStr>()?;
                r.read_deferred()?;
                self.$field = value.take(r)?;
                self.return_code = r.read_i32()?;
                Ok(())
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $req {
            pub this: ::dcom::OrpcThis,
        }

        impl $req {
            pub fn to_op(&self) -> $op {
                $op {
                    this: self.this.clone(),
                    ..Default::default()
                }
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    this: op.this.clone(),
                }
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $resp {
            pub that: ::dcom::OrpcThat,
            pub $field: Option<::oaut::BStr>,
            pub return_code: i32,
        }

        impl $resp {
            pub fn to_op(&self, op: &mut $op) {
                op.that = self.that.clone();
                op.$field = self.$field.clone();
                op.return_code = self.return_code;
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    that: op.that.clone(),
                    $field: op.$field.clone(),
                    return_code: op.return_code,
                }
            }
        }
    };
}

/// A `[propput]` taking a BSTR behind a unique pointer
macro_rules! bstr_set_operation {
    ($op:ident, $req:ident, $resp:ident, $opnum:expr, $name:literal, $field:ident) => {
        #[derive(Debug, Default)]
        pub struct $op {
            pub this: ::dcom::OrpcThis,
            pub that: ::dcom::OrpcThat,
            pub $field: Option<::oaut::BStr>,
            pub return_code: i32,
        }

        impl ::dcom::Operation for $op {
            fn op_num(&self) -> u16 {
                $opnum
            }

            fn op_name(&self) -> &'static str {
                $name
            }

            fn marshal_ndr_request(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_request_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.this, w)?;
                w.write_deferred()?;
                w.write_pointer(self.$field.as_ref())?;
                w.write_deferred()?;
                Ok(())
            }

            fn unmarshal_ndr_request(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let this = <::dcom::OrpcThis as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.this = <::dcom::OrpcThis as ::ndr::NdrPointee>::take_repr(this, r)?;
                let value = r.read_pointer::<::oaut::BStr>()?;
                r.read_deferred()?;
                self.$field = value.take(r)?;
                Ok(())
            }

            fn marshal_ndr_response(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_response_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.that, w)?;
                w.write_deferred()?;
                w.write_i32(self.return_code);
                Ok(())
            }

            fn unmarshal_ndr_response(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let that = <::dcom::OrpcThat as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.that = <::dcom::OrpcThat as ::ndr::NdrPointee>::take_repr(that, r)?;
                self.return_code = r.read_i32()?;
                Ok(())
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $req {
            pub this: ::dcom::OrpcThis,
            pub $field: Option<::oaut::BStr>,
        }

        impl $req {
            pub fn to_op(&self) -> $op {
                $op {
                    this: self.this.clone(),
                    $field: self.$field.clone(),
                    ..Default::default()
                }
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    this: op.this.clone(),
                    $field: op.$field.clone(),
                }
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $resp {
            pub that: ::dcom::OrpcThat,
            pub return_code: i32,
        }

        impl $resp {
            pub fn to_op(&self, op: &mut $op) {
                op.that = self.that.clone();
                op.return_code = self.return_code;
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    that: op.that.clone(),
                    return_code: op.return_code,
                }
            }
        }
    };
}

/// A `[propget]` returning a boolean as a 4-byte integer
macro_rules! bool_get_operation {
    ($op:ident, $req:ident, $resp:ident, $opnum:expr, $name:literal, $field:ident) => {
        #[derive(Debug, Default)]
        pub struct $op {
            pub this: ::dcom::OrpcThis,
            pub that: ::dcom::OrpcThat,
            pub $field: bool,
            pub return_code: i32,
        }

        impl ::dcom::Operation for $op {
            fn op_num(&self) -> u16 {
                $opnum
            }

            fn op_name(&self) -> &'static str {
                $name
            }

            fn marshal_ndr_request(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_request_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.this, w)?;
                w.write_deferred()?;
                Ok(())
            }

            fn unmarshal_ndr_request(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let this = <::dcom::OrpcThis as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.this = <::dcom::OrpcThis as ::ndr::NdrPointee>::take_repr(this, r)?;
                Ok(())
            }

            fn marshal_ndr_response(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_response_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.that, w)?;
                w.write_deferred()?;
                w.write_bool(self.$field);
                w.write_i32(self.return_code);
                Ok(())
            }

            fn unmarshal_ndr_response(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let that = <::dcom::OrpcThat as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.that = <::dcom::OrpcThat as ::ndr::NdrPointee>::take_repr(that, r)?;
                self.$field = r.read_bool()?;
                self.return_code = r.read_i32()?;
                Ok(())
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $req {
            pub this: ::dcom::OrpcThis,
        }

        impl $req {
            pub fn to_op(&self) -> $op {
                $op {
                    this: self.this.clone(),
                    ..Default::default()
                }
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    this: op.this.clone(),
                }
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $resp {
            pub that: ::dcom::OrpcThat,
            pub $field: bool,
            pub return_code: i32,
        }

        impl $resp {
            pub fn to_op(&self, op: &mut $op) {
                op.that = self.that.clone();
                op.$field = self.$field;
                op.return_code = self.return_code;
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    that: op.that.clone(),
                    $field: op.$field,
                    return_code: op.return_code,
                }
            }
        }
    };
}

/// A `[propput]` taking a boolean as a 4-byte integer
macro_rules! bool_set_operation {
    ($op:ident, $req:ident, $resp:ident, $opnum:expr, $name:literal, $field:ident) => {
        #[derive(Debug, Default)]
        pub struct $op {
            pub this: ::dcom::OrpcThis,
            pub that: ::dcom::OrpcThat,
            pub $field: bool,
            pub return_code: i32,
        }

        impl ::dcom::Operation for $op {
            fn op_num(&self) -> u16 {
                $opnum
            }

            fn op_name(&self) -> &'static str {
                $name
            }

            fn marshal_ndr_request(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_request_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.this, w)?;
                w.write_deferred()?;
                w.write_bool(self.$field);
                Ok(())
            }

            fn unmarshal_ndr_request(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let this = <::dcom::OrpcThis as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.this = <::dcom::OrpcThis as ::ndr::NdrPointee>::take_repr(this, r)?;
                self.$field = r.read_bool()?;
                Ok(())
            }

            fn marshal_ndr_response(&mut self, w: &mut ::ndr::NdrWriter) -> ::dcom::Result<()> {
                self.prepare_response_payload()?;
                ::ndr::NdrMarshal::marshal_ndr(&self.that, w)?;
                w.write_deferred()?;
                w.write_i32(self.return_code);
                Ok(())
            }

            fn unmarshal_ndr_response(&mut self, r: &mut ::ndr::NdrReader) -> ::dcom::Result<()> {
                let that = <::dcom::OrpcThat as ::ndr::NdrPointee>::read_repr(r)?;
                r.read_deferred()?;
                self.that = <::dcom::OrpcThat as ::ndr::NdrPointee>::take_repr(that, r)?;
                self.return_code = r.read_i32()?;
                Ok(())
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $req {
            pub this: ::dcom::OrpcThis,
            pub $field: bool,
        }

        impl $req {
            pub fn to_op(&self) -> $op {
                $op {
                    this: self.this.clone(),
                    $field: self.$field,
                    ..Default::default()
                }
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    this: op.this.clone(),
                    $field: op.$field,
                }
            }
        }

        #[derive(Clone, Debug, Default)]
        pub struct $resp {
            pub that: ::dcom::OrpcThat,
            pub return_code: i32,
        }

        impl $resp {
            pub fn to_op(&self, op: &mut $op) {
                op.that = self.that.clone();
                op.return_code = self.return_code;
            }

            pub fn from_op(op: &$op) -> Self {
                Self {
                    that: op.that.clone(),
                    return_code: op.return_code,
                }
            }
        }
    };
}

/// A client proxy method: resolve the identity, run the envelope over the
/// connection, and turn a failing `Return` into a [`CallError::Fault`]
/// that still carries the decoded response.
macro_rules! proxy_call {
    ($fn_name:ident, $req:ty, $resp:ident) => {
        pub async fn $fn_name(
            &self,
            req: &$req,
            opts: ::dcom::CallOptions,
        ) -> ::dcom::CallResult<$resp> {
            let opts = opts.resolve_ipid(self.ipid)?;
            let mut op = req.to_op();
            self.conn.invoke(&mut op, &opts).await?;
            let resp = $resp::from_op(&op);
            if op.return_code != ::dcom::hresult::S_OK {
                return Err(::dcom::CallError::Fault {
                    op_name: ::dcom::Operation::op_name(&op),
                    hresult: op.return_code,
                    response: resp,
                });
            }
            Ok(resp)
        }
    };
}

/// A dispatch arm: decode the request, run the handler, fold an
/// HRESULT-bearing error into the response status, and box the envelope.
macro_rules! dispatch_op {
    ($server:expr, $r:expr, $op:ty, $req:ty, $method:ident) => {{
        let mut op = <$op>::default();
        ::dcom::Operation::unmarshal_ndr_request(&mut op, $r)?;
        ::tracing::debug!(op_name = ::dcom::Operation::op_name(&op), "dispatching");
        let req = <$req>::from_op(&op);
        match $server.$method(&req).await {
            Ok(resp) => resp.to_op(&mut op),
            Err(e) => op.return_code = ::dcom::fail_status(e)?,
        }
        Ok(Some(Box::new(op) as Box<dyn ::dcom::Operation>))
    }};
}

pub(crate) use {
    bool_get_operation, bool_set_operation, bstr_get_operation, bstr_set_operation, dispatch_op,
    proxy_call,
};
